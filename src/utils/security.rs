const VISIBLE_PREFIX: usize = 4;

/// Keeps the first few characters of a token so log lines stay correlatable.
pub fn mask_token(token: &str) -> String {
    match token.char_indices().nth(VISIBLE_PREFIX) {
        Some((cut, _)) => format!("{}***", &token[..cut]),
        None => token.to_string(),
    }
}

/// Masks the path segment after `/t/` in a scanned URL.
pub fn mask_payload(payload: &str) -> String {
    if let Some(start) = payload.rfind("/t/") {
        let (head, token) = payload.split_at(start + 3);
        format!("{head}{}", mask_token(token))
    } else {
        mask_token(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_tokens_are_truncated() {
        assert_eq!(mask_token("AB3dE9fghi"), "AB3d***");
    }

    #[test]
    fn short_values_pass_through() {
        assert_eq!(mask_token("SEED"), "SEED");
        assert_eq!(mask_token(""), "");
    }

    #[test]
    fn url_payloads_keep_their_prefix() {
        assert_eq!(
            mask_payload("http://aftm.j51.eu/t/Zz987qwErt"),
            "http://aftm.j51.eu/t/Zz98***"
        );
    }
}
