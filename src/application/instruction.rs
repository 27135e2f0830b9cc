//! Free-text trade instruction parsing ("Buy 10 Reliance").

use crate::domain::{Quantity, TradeAction, TradeInstruction};
use crate::error::TradeError;

/// Parse the action and quantity out of a trade instruction.
///
/// Matching is case-insensitive on whole words. The action is the first
/// `buy` or `sell` word. The quantity is the first positive integer after
/// the action word, else the first positive integer anywhere, else
/// `default_quantity`.
///
/// # Errors
///
/// Returns [`TradeError::MissingAction`] when neither `buy` nor `sell`
/// appears, and [`TradeError::ZeroQuantity`] when no positive quantity
/// can be found and the default is not positive either.
pub fn parse_instruction(
    text: &str,
    default_quantity: Quantity,
) -> Result<TradeInstruction, TradeError> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();

    let Some((position, action)) = words.iter().enumerate().find_map(|(i, word)| {
        match word.as_str() {
            "buy" => Some((i, TradeAction::Buy)),
            "sell" => Some((i, TradeAction::Sell)),
            _ => None,
        }
    }) else {
        return Err(TradeError::MissingAction {
            instruction: text.trim().to_string(),
        });
    };

    let quantity = first_quantity(&words[position + 1..])
        .or_else(|| first_quantity(&words))
        .unwrap_or(default_quantity);
    if quantity <= 0 {
        return Err(TradeError::ZeroQuantity);
    }

    Ok(TradeInstruction { action, quantity })
}

fn first_quantity(words: &[String]) -> Option<Quantity> {
    words
        .iter()
        .filter(|word| word.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|word| word.parse::<Quantity>().ok())
        .find(|quantity| *quantity > 0)
}
