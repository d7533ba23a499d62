const FALLBACK_NAME: &str = "download.wav";
const MAX_LEN: usize = 120;

/// Local file name for a server-supplied download name.
///
/// The server name is untrusted: path separators and control characters are
/// replaced, leading dots are stripped and reserved Windows device names are
/// suffixed so the result always stays inside the output directory.
pub fn safe_download_name(server_name: &str) -> String {
    let cleaned: String = server_name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut name = cleaned
        .trim_start_matches(['.', ' '])
        .trim_end_matches([' ', '.'])
        .to_string();
    if name.is_empty() || name.chars().all(|c| c == '_') {
        return FALLBACK_NAME.to_string();
    }
    if name.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    let stem_len = name.find('.').unwrap_or(name.len());
    if is_reserved_windows_name(&name[..stem_len]) {
        name.insert(stem_len, '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
