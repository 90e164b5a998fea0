use serde_json::Value;

/// Print JSON to stdout: indented for a terminal, one line when piped.
pub fn print_json(value: &Value) {
    let rendered = if atty::is(atty::Stream::Stdout) {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
