const PREFIX_LEN: usize = 6;
const SUFFIX_LEN: usize = 4;

/// Shortens an account address for display: `0x1234...abcd`.
///
/// Empty input stays empty. Short inputs are not padded, so their
/// head and tail may overlap (`0x1234` becomes `0x1234...1234`).
pub fn shorten_account(account: &str) -> String {
    if account.is_empty() {
        return String::new();
    }

    let len = account.chars().count();
    let start = account.chars().take(PREFIX_LEN).collect::<String>();
    let end = account
        .chars()
        .skip(len.saturating_sub(SUFFIX_LEN))
        .collect::<String>();
    format!("{start}...{end}")
}
