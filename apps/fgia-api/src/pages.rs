const INDEX_HTML: &str = include_str!("../static/index.html");
const SIGNIN_HTML: &str = include_str!("../static/signin.html");
const ERROR_HTML: &str = include_str!("../static/error.html");

pub fn index(email: Option<&str>) -> String {
	INDEX_HTML.replace("{{user_email}}", &escape_html(email.unwrap_or("")))
}

pub fn signin() -> String {
	SIGNIN_HTML.to_string()
}

pub fn access_denied(allowed_suffix: &str) -> String {
	ERROR_HTML.replace("{{allowed_suffix}}", &escape_html(allowed_suffix))
}

fn escape_html(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}

	out
}
