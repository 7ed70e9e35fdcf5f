//! Send one SMS through a modem exposed over TCP.
//!
//! Serial-to-network bridges (ser2net, socat, many industrial gateways) expose
//! a USB modem's AT port as a plain TCP socket. This example connects to one,
//! detects the modem model, initializes it and sends a single message.
//!
//! # Prerequisites
//!
//! - A supported modem (ZTE MF710) reachable through a TCP bridge, e.g.
//!   `socat TCP-LISTEN:7000,reuseaddr FILE:/dev/ttyUSB2,raw,echo=0`
//!
//! # Usage
//!
//! ```bash
//! cargo run --example tcp_sms -- --host 192.168.8.1 --port 7000 --to 5511999999999 --text "hello"
//! ```

use std::env;
use std::time::Duration;

use atmodem::{ModemBuilder, StreamChannel};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for every AT transaction)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let Some(to) = args.to else {
        eprintln!("Error: --to is required");
        std::process::exit(1);
    };

    println!("Connecting to {}:{}...", args.host, args.port);
    let stream = TcpStream::connect((args.host.as_str(), args.port)).await?;

    let mut modem = ModemBuilder::new(StreamChannel::new(stream))
        .timeout(Duration::from_secs(args.timeout))
        .open()
        .await?;
    println!("Modem ready: {}", modem.model());

    println!("\nSending to {}", to);
    println!("{}", "-".repeat(50));

    let result = modem.send_sms(&to, &args.text).await;
    println!("{}", result.raw_response);
    println!("{}", "-".repeat(50));

    match result.failure_message() {
        None => println!(
            "Sent (reference: {})",
            result.reference.as_deref().unwrap_or("none")
        ),
        Some(message) => eprintln!("Send failed: {}", message),
    }

    drop(modem.close());
    println!("Done!");

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    to: Option<String>,
    text: String,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 7000u16;
        let mut to = None;
        let mut text = "Hello from atmodem".to_string();
        let mut timeout = 5u64;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(7000);
                    }
                }
                "--to" => {
                    i += 1;
                    if i < args.len() {
                        to = Some(args[i].clone());
                    }
                }
                "--text" | "-m" => {
                    i += 1;
                    if i < args.len() {
                        text = args[i].clone();
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(5);
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            to,
            text,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"atmodem tcp_sms example

USAGE:
    cargo run --example tcp_sms -- [OPTIONS] --to <NUMBER>

OPTIONS:
    -h, --host <HOST>        Bridge host [default: localhost]
    -p, --port <PORT>        Bridge port [default: 7000]
        --to <NUMBER>        Destination number (plain, 00- or +-prefixed)
    -m, --text <TEXT>        Message body [default: "Hello from atmodem"]
    -t, --timeout <SECS>     AT command timeout [default: 5]
    --help                   Print this help message

EXAMPLES:
    cargo run --example tcp_sms -- --host 192.168.8.1 --to 005511999999999 --text "build passed"
"#
        );
    }
}
