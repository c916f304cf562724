/*
Repair of double-encoded UTF-8 text ("ChÃ¢teau" -> "Château").

Text that went UTF-8 -> Latin-1 -> UTF-8 shows every accented character
as two or three junk characters. Repair is best effort and never fails:
a string that cannot be repaired is returned as is.
*/

use serde_json::Value;

// Mis-encoded sequences that the Latin-1 round trip cannot undo because the
// damage went through Windows-1252 (curly quotes, dashes, and a few accents
// whose second byte lands on a cp1252-only glyph).
// Longer sequences come before their prefixes.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{e2}\u{80}\u{99}", "'"),
    ("â€™", "'"),
    ("â€“", "–"),
    ("â€”", "—"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€", "\""),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ãª", "ê"),
    ("Ã«", "ë"),
    ("Ã\u{a0}", "à"),
    ("Ã ", "à"),
    ("Ã¢", "â"),
    ("Ã¤", "ä"),
    ("Ã¯", "ï"),
    ("Ã®", "î"),
    ("Ã¬", "ì"),
    ("Ã´", "ô"),
    ("Ã¶", "ö"),
    ("Ã²", "ò"),
    ("Ã¹", "ù"),
    ("Ã»", "û"),
    ("Ã¼", "ü"),
    ("Ã§", "ç"),
    ("Ã±", "ñ"),
    ("Ã‰", "É"),
    ("Ã€", "À"),
    ("Ã‚", "Â"),
    ("Ã”", "Ô"),
    ("Ã›", "Û"),
    ("Ã‡", "Ç"),
];

/// Apply [`fix_text`] to every string in a JSON tree. Keys are left alone.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(fix_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

pub fn fix_text(text: &str) -> String {
    if let Some(fixed) = reinterpret_latin1(text) {
        return fixed;
    }

    let mut result = text.to_string();
    for (bad, good) in REPLACEMENTS {
        if result.contains(bad) {
            result = result.replace(bad, good);
        }
    }
    result
}

// Read each char back as the Latin-1 byte it was decoded from, then decode
// those bytes as UTF-8. Fails when a char is outside Latin-1 or the bytes are
// not valid UTF-8; plain ASCII comes back unchanged.
fn reinterpret_latin1(text: &str) -> Option<String> {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}
