//! # Cashier Chaos Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Binary Entry Point                              │
//! │                                                                         │
//! │  main() ──► cashier_cli_lib::run() ──► stdin loop until "quit" / EOF   │
//! │                                                                         │
//! │  Exit codes: 0 on a clean quit, 1 on a startup or I/O failure           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() {
    if let Err(e) = cashier_cli_lib::run().await {
        eprintln!("cashier: {}", e);
        std::process::exit(1);
    }
}
