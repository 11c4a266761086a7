/// Collapses every run of whitespace (spaces, tabs, newlines, NBSP) into one space and trims.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
