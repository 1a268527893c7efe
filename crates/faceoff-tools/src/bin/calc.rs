//! `calc <num1> <operator> <num2>` — prints the result with precision
//! matching the inputs.

use std::process::ExitCode;

use faceoff_tools::calc;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [lhs, op, rhs] = args.as_slice() else {
        eprintln!("Usage: calc <num1> <operator> <num2>");
        return ExitCode::FAILURE;
    };

    match calc::evaluate(lhs, op, rhs) {
        Ok(result) => {
            println!("{result}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
