// Shorten address for log output
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let start: String = chars[..5].iter().collect();
    let end: String = chars[chars.len() - 5..].iter().collect();

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_addresses_are_untouched() {
        assert_eq!(shorten_address("0xWallet1"), "0xWallet1");
    }

    #[test]
    fn long_addresses_keep_both_ends() {
        assert_eq!(
            shorten_address("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"),
            "9WzDX...tAWWM"
        );
    }
}
