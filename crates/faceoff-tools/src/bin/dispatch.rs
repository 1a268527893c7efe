//! Line-based slash-command REPL. Reads commands from stdin until
//! `/quit` or end of input.

use std::io::{self, BufRead, Write};

use faceoff_tools::dispatch::{dispatch, Reply};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut rng = rand::rng();

    loop {
        print!("Enter command: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match dispatch(&line, &mut rng) {
            Reply::Text(text) => println!("{text}"),
            Reply::Quit => {
                println!("Exiting.");
                break;
            }
        }
    }

    Ok(())
}
