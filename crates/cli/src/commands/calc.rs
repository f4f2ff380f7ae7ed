//! `riskcast calc`: the calculator tool without a model.

use riskcast_tools::{evaluate, filter_expression, format_number};

use crate::app::CliResult;

pub fn run(expression: &str) -> CliResult {
    let filtered = filter_expression(expression);
    let value = evaluate(&filtered).map_err(|e| format!("Cannot evaluate '{}': {e}", filtered.trim()))?;
    println!("{}", format_number(value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_mixed_text() {
        assert!(run("what is 2 + 2").is_ok());
        assert!(run("no numbers here").is_err());
    }
}
