/// Describes who is typing, or `None` when nobody is.
pub fn typing_indicator_text(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(format!("{one} is typing...")),
        [first, second] => Some(format!("{first} and {second} are typing...")),
        [first, rest @ ..] => Some(format!("{first} and {} others are typing...", rest.len())),
    }
}
