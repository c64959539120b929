//! Body decoding by `Content-Type` charset.

/// Extracts the `charset` parameter from a `Content-Type` value.
fn charset(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, v)| v.trim().trim_matches('"'))
}

fn is_latin1(charset: &str) -> bool {
    ["iso-8859-1", "iso8859-1", "latin1", "latin-1"]
        .iter()
        .any(|name| charset.eq_ignore_ascii_case(name))
}

/// Decodes a response body as text.
///
/// ISO-8859-1 maps each byte to the code point of the same value; everything
/// else (including a missing charset) is decoded as UTF-8, replacing invalid
/// sequences.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    match content_type.and_then(charset) {
        Some(cs) if is_latin1(cs) => body.iter().map(|&b| char::from(b)).collect(),
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_by_default() {
        let body = "Atualização".as_bytes();
        assert_eq!(decode_body(body, None), "Atualização");
        assert_eq!(decode_body(body, Some("text/html")), "Atualização");
    }

    #[test]
    fn latin1_charset() {
        let body = [b'A', b'n', b'e', b'x', b'o', b' ', 0xE7, 0xE3];
        assert_eq!(
            decode_body(&body, Some("text/html; charset=ISO-8859-1")),
            "Anexo çã"
        );
        assert_eq!(
            decode_body(&body, Some("text/html; charset=\"latin1\"")),
            "Anexo çã"
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let body = [b'o', b'k', 0xFF];
        assert_eq!(decode_body(&body, Some("text/html; charset=utf-8")), "ok\u{FFFD}");
    }

    #[test]
    fn charset_param_parsing() {
        assert_eq!(charset("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(charset("text/html;Charset=\"UTF-8\""), Some("UTF-8"));
        assert_eq!(charset("text/html"), None);
    }
}
