/// Parses an optional query value, treating absent or unparseable input as `None`.
///
/// Cron and dashboard callers are lenient clients; a bad value falls back to the default
/// instead of rejecting the request.
pub fn parse_lenient(value: Option<&str>) -> Option<usize> {
    value.and_then(|value| value.trim().parse::<usize>().ok())
}
