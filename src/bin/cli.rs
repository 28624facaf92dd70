//! apiros CLI Client
//!
//! Interactive console for the RouterOS API.
//!
//! Each input line is one word; an empty line sends the collected words as
//! a sentence. Every sentence received is printed as `>>> word` lines.

use std::io::{self, BufRead};
use std::thread;

use apiros::config::DEFAULT_PORT;
use apiros::{ApiError, Config, LoginMethod, Session};
use clap::Parser;
use crossbeam::channel::{self, Receiver};
use crossbeam::select;
use tracing_subscriber::{fmt, EnvFilter};

/// apiros CLI
#[derive(Parser, Debug)]
#[command(name = "apiros-cli")]
#[command(about = "Interactive RouterOS API console")]
#[command(version)]
struct Args {
    /// Router address
    host: String,

    /// User name
    user: String,

    /// Password
    #[arg(default_value = "")]
    password: String,

    /// API port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log every word sent and received
    #[arg(short, long)]
    debug: bool,

    /// Send the password in plain text (newer routers)
    #[arg(long)]
    plain_login: bool,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "0")]
    connect_timeout_ms: u64,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.debug { "info,apiros=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> apiros::Result<()> {
    let login_method = if args.plain_login {
        LoginMethod::Plain
    } else {
        LoginMethod::Challenge
    };

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.connect_timeout_ms)
        .login_method(login_method)
        .debug(args.debug)
        .build();

    let mut session = Session::open(config)?;

    let replies = session.login(&args.user, &args.password)?;
    if let Some(reply) = replies.iter().find(|r| r.is_error()) {
        return Err(ApiError::Login(
            reply.message().unwrap_or_else(|| reply.tag.to_string()),
        ));
    }

    let (mut reader, mut writer) = session.into_split()?;

    // Socket side: one sentence per message, the final message is the error
    let (sentence_tx, sentence_rx) = channel::unbounded();
    thread::spawn(move || loop {
        let result = reader.read_sentence();
        let failed = result.is_err();
        if sentence_tx.send(result).is_err() || failed {
            break;
        }
    });

    // Input side: one line per message, disconnects at end of input
    let (line_tx, mut line_rx): (_, Receiver<String>) = channel::unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut pending: Vec<String> = Vec::new();

    loop {
        let mut input_closed = false;

        select! {
            recv(sentence_rx) -> msg => match msg {
                Ok(Ok(words)) => print_sentence(&words),
                Ok(Err(e)) if e.is_disconnect() => {
                    tracing::info!("Router closed the connection");
                    return Ok(());
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Ok(()),
            },
            recv(line_rx) -> msg => match msg {
                Ok(line) => {
                    let line = line.trim_end_matches('\r');
                    if line.is_empty() {
                        writer.write_sentence(pending.drain(..))?;
                    } else {
                        pending.push(line.to_string());
                    }
                }
                Err(_) => {
                    // End of input: send what is left, then ask the router to hang up
                    writer.write_sentence(pending.drain(..))?;
                    writer.write_sentence(["/quit"])?;
                    input_closed = true;
                }
            },
        }

        if input_closed {
            line_rx = channel::never();
        }
    }
}

fn print_sentence(words: &[String]) {
    if words.is_empty() {
        return;
    }
    for word in words {
        println!(">>> {}", word);
    }
    println!();
}
