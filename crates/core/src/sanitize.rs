/// characters that cannot appear in a single path segment on ntfs.
pub const FORBIDDEN_CHARS: [char; 9] = ['\\', '/', '*', ':', '?', '|', '"', '<', '>'];

/// removes every forbidden character so `name` can be used as one path segment.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|ch| !FORBIDDEN_CHARS.contains(ch))
        .collect()
}
