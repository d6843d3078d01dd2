use log::info;
use std::error::Error;
use std::io::{ self, BufRead, Write };
use std::sync::{ Arc, Mutex };

use super::HttpRelay;
use super::session::ChatSession;

/// Interactive terminal chat against a running relay endpoint. Chunks are
/// printed as they arrive, so replies appear progressively.
pub async fn run(relay_url: &str, model: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Console client connected to relay: {}", relay_url);

    let transport = Arc::new(HttpRelay::new(relay_url));
    let mut session = ChatSession::new(transport, model);

    // Tracks how much of the pending reply is already on screen so each
    // notification prints only the new tail.
    let printed = Arc::new(Mutex::new(0usize));
    let progress = printed.clone();
    session.subscribe(move |_, pending| {
        let Ok(mut done) = progress.lock() else {
            return;
        };
        match pending {
            Some(text) if text.len() > *done => {
                print!("{}", &text[*done..]);
                let _ = io::stdout().flush();
                *done = text.len();
            }
            None => {
                *done = 0;
            }
            _ => {}
        }
    });

    println!("BioinfoGPT console. /model <name> switches the model, /quit exits.");
    let stdin = io::stdin();

    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == "/quit" {
            break;
        }
        if let Some(model) = line.strip_prefix("/model ") {
            session.set_model(model.trim());
            println!("Model switched to: {}", session.model());
            continue;
        }
        if line.is_empty() {
            continue;
        }

        session.set_input(line);
        print!("assistant> ");
        io::stdout().flush()?;
        match session.submit().await {
            Ok(_) => println!(),
            Err(e) => {
                println!();
                eprintln!("error: {}", e);
            }
        }
    }

    Ok(())
}
