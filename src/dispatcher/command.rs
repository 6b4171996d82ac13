pub const DIAGNOSTICS: &str = "DIAGNOSTICS";
pub const RESET: &str = "RESET";
pub const SEED: &str = "SEED";

/// What a scanned payload asks the kiosk to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanCommand<'a> {
    Diagnostics,
    Reset,
    Seed,
    Token(&'a str),
}

impl<'a> ScanCommand<'a> {
    pub fn classify(payload: &'a str, url_prefix: &str) -> Self {
        match parse_qr_string(payload, url_prefix) {
            DIAGNOSTICS => Self::Diagnostics,
            RESET => Self::Reset,
            SEED => Self::Seed,
            token => Self::Token(token),
        }
    }
}

/// Strips the token URL prefix; payloads without it are taken as-is.
pub fn parse_qr_string<'a>(payload: &'a str, url_prefix: &str) -> &'a str {
    let payload = payload.trim();
    payload.strip_prefix(url_prefix).unwrap_or(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "http://aftm.j51.eu/t/";

    #[test]
    fn reserved_words_are_commands() {
        assert_eq!(
            ScanCommand::classify("http://aftm.j51.eu/t/DIAGNOSTICS", PREFIX),
            ScanCommand::Diagnostics
        );
        assert_eq!(ScanCommand::classify("http://aftm.j51.eu/t/RESET", PREFIX), ScanCommand::Reset);
        assert_eq!(ScanCommand::classify("http://aftm.j51.eu/t/SEED", PREFIX), ScanCommand::Seed);
    }

    #[test]
    fn everything_else_is_a_token() {
        assert_eq!(
            ScanCommand::classify("http://aftm.j51.eu/t/AB3dE9fghi", PREFIX),
            ScanCommand::Token("AB3dE9fghi")
        );
        assert_eq!(
            ScanCommand::classify("http://aftm.j51.eu/t/seed", PREFIX),
            ScanCommand::Token("seed")
        );
    }

    #[test]
    fn only_the_exact_prefix_is_stripped() {
        // Tokens starting with URL characters must survive intact.
        assert_eq!(parse_qr_string("http://aftm.j51.eu/t/hat1234567", PREFIX), "hat1234567");
        assert_eq!(parse_qr_string("https://elsewhere/t/abc", PREFIX), "https://elsewhere/t/abc");
        assert_eq!(parse_qr_string("RESET\n", PREFIX), "RESET");
    }
}
