//! Slash-command dispatch over single lines of input.
//!
//! Command words are case-insensitive; arguments keep their case.
//! Unknown commands and malformed arguments come back as error text,
//! never as a crash.

use rand::Rng;

/// What the caller should do with one dispatched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this and keep reading.
    Text(String),
    /// Stop the read loop.
    Quit,
}

/// Dispatches one input line to its command handler.
pub fn dispatch(line: &str, rng: &mut impl Rng) -> Reply {
    let trimmed = line.trim();
    let (command, rest) = match trimmed.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (trimmed, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "/greet" => {
            if rest.is_empty() {
                Reply::Text("Error: missing name. Usage: /greet <name>".into())
            } else {
                Reply::Text(format!("Hello, {rest}!"))
            }
        }
        "/roll" => roll(rest, rng),
        "/echo" => {
            if rest.is_empty() {
                Reply::Text("Error: missing message. Usage: /echo <message>".into())
            } else {
                Reply::Text(rest.to_string())
            }
        }
        "/quit" => Reply::Quit,
        _ => Reply::Text(format!("Error: unrecognized command {command:?}")),
    }
}

/// `<num>d<sides>`: rolls `num` dice with `sides` faces and reports the
/// sum.
fn roll(spec: &str, rng: &mut impl Rng) -> Reply {
    let usage = || Reply::Text("Error: invalid dice format. Usage: /roll <num>d<sides>".into());

    let Some((num, sides)) = spec.split_once(['d', 'D']) else {
        return usage();
    };
    let (Ok(num), Ok(sides)) = (num.parse::<u32>(), sides.parse::<u32>()) else {
        return usage();
    };
    if num == 0 || sides == 0 {
        return Reply::Text("Error: both dice values must be positive".into());
    }

    let total: u64 = (0..num).map(|_| rng.random_range(1..=sides) as u64).sum();
    Reply::Text(format!("Rolled {num}d{sides} and got {total}!"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_greet_uses_the_given_name() {
        assert_eq!(
            dispatch("/greet Ada Lovelace", &mut rng()),
            Reply::Text("Hello, Ada Lovelace!".into())
        );
        assert_eq!(
            dispatch("/greet", &mut rng()),
            Reply::Text("Error: missing name. Usage: /greet <name>".into())
        );
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(
            dispatch("/GREET Ada", &mut rng()),
            Reply::Text("Hello, Ada!".into())
        );
        assert_eq!(dispatch("/Quit", &mut rng()), Reply::Quit);
    }

    #[test]
    fn test_echo_returns_the_message_verbatim() {
        assert_eq!(
            dispatch("/echo  MiXeD Case  ", &mut rng()),
            Reply::Text("MiXeD Case".into())
        );
    }

    #[test]
    fn test_roll_stays_within_dice_bounds() {
        for _ in 0..20 {
            let Reply::Text(text) = dispatch("/roll 2d6", &mut rand::rng()) else {
                panic!("roll must produce text");
            };
            let total: u64 = text
                .trim_end_matches('!')
                .rsplit(' ')
                .next()
                .unwrap()
                .parse()
                .unwrap();
            assert!((2..=12).contains(&total), "2d6 out of range: {total}");
        }
    }

    #[test]
    fn test_roll_rejects_malformed_specs() {
        for bad in ["", "2x6", "d6", "2d", "0d6", "2d0", "-1d6"] {
            let Reply::Text(text) = dispatch(&format!("/roll {bad}"), &mut rng()) else {
                panic!("bad roll must produce text");
            };
            assert!(text.starts_with("Error"), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let Reply::Text(text) = dispatch("/frobnicate now", &mut rng()) else {
            panic!()
        };
        assert!(text.contains("unrecognized"));
    }
}
