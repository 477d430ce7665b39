//! HTML pages rendered from the core view-models.

use axum::response::Html;
use impostor_core::{ResultsView, TurnRole, TurnView, WordBank, MAX_PLAYERS, MIN_PLAYERS};
use std::fmt::Write;

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: system-ui, sans-serif; min-height: 100vh; padding: 20px;
       background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
.container { max-width: 560px; margin: 0 auto; background: white; border-radius: 20px;
             padding: 32px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); }
h1 { color: #667eea; text-align: center; margin-bottom: 24px; }
h2 { color: #764ba2; margin-bottom: 16px; }
label { display: block; margin: 16px 0 8px; font-weight: 600; color: #333; }
input[type="text"], input[type="number"] { width: 100%; padding: 12px; font-size: 16px;
       border: 2px solid #ddd; border-radius: 10px; }
.categories { max-height: 360px; overflow-y: auto; border: 2px solid #eee; border-radius: 10px; padding: 12px; }
.categories label { display: flex; align-items: center; gap: 12px; font-weight: 400; margin: 6px 0; }
.checkbox { width: 22px; height: 22px; }
button { width: 100%; margin-top: 20px; padding: 15px; font-size: 18px; font-weight: 600; color: white;
         border: none; border-radius: 10px; cursor: pointer;
         background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
button.secondary { background: #6c757d; }
.error { background: #ffe3e3; color: #c92a2a; padding: 12px; border-radius: 10px; margin-bottom: 16px; }
.notice { color: #666; }
.player-card { color: white; text-align: center; padding: 24px; border-radius: 16px; margin-bottom: 20px; }
.player-card .turn { opacity: 0.85; }
.secret { user-select: none; text-align: center; font-weight: bold; font-size: 2em; padding: 40px 16px;
          border-radius: 10px; border: 2px dashed #ccc; color: white; background: white;
          max-height: 140px; overflow: hidden; transition: all 0.1s ease-out; }
.secret.revealed.civilian { color: #667eea; }
.secret.revealed.impostor { background: #ff6b6b; font-size: 1.5em; max-height: 500px; }
.hint { display: none; margin-top: 20px; font-size: 0.7em; background: rgba(255,255,255,0.8); color: #333;
        padding: 10px; border-radius: 8px; }
.secret.revealed .hint { display: block; }
.result { border-left: 5px solid #667eea; background: #f8f9fa; padding: 16px; border-radius: 8px; margin: 12px 0; }
#secret-results { max-height: 0; opacity: 0; overflow: hidden; transition: all 0.5s ease-in-out;
                  background: #ffe3e3; border-left-color: #ff6b6b; }
#secret-results.shown { max-height: 400px; opacity: 1; }
#countdown { font-size: 2.5em; text-align: center; font-weight: bold; color: #764ba2; }
"#;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>"#,
        title = escape(title),
    ))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn setup_page(bank: &WordBank, error: Option<&str>, player_names: &str) -> Html<String> {
    let mut body = String::from("<h1>Impostor</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, r#"<div class="error">{}</div>"#, escape(error));
    }

    let _ = write!(
        body,
        r#"<form method="post" action="/setup">
<label for="player_names">Players ({MIN_PLAYERS} to {MAX_PLAYERS}, comma separated)</label>
<input type="text" id="player_names" name="player_names" value="{names}" placeholder="Ana, Carlos, Diego, Eva" required>
<label for="num_impostors">Impostors</label>
<input type="number" id="num_impostors" name="num_impostors" value="1" min="1" max="{max_impostors}">
<label>Categories</label>
<div class="categories">
"#,
        names = escape(player_names),
        max_impostors = MAX_PLAYERS - 1,
    );

    if bank.is_empty() {
        body.push_str(
            r#"<p class="notice">No categories available. Add JSON category files to the categories directory.</p>
"#,
        );
    }
    for category in bank.values() {
        let name = escape(&category.name);
        let _ = writeln!(
            body,
            r#"<label><input class="checkbox" type="checkbox" name="selected_categories" value="{name}" checked> {name} ({count} words)</label>"#,
            count = category.words.len(),
        );
    }

    body.push_str(
        r#"</div>
<label><input class="checkbox" type="checkbox" name="hints_enabled" checked> Give impostors a hint</label>
<button type="submit">Start game</button>
</form>"#,
    );

    layout("Impostor - Setup", &body)
}

pub fn player_page(view: &TurnView) -> Html<String> {
    let last_turn = view.turn_number >= view.total_players;
    let (kind, secret) = match &view.role {
        TurnRole::Civilian { word, category } => (
            "civilian",
            format!(
                r#"{word}<div class="notice" style="font-size:0.4em">{category}</div>"#,
                word = escape(word),
                category = escape(category),
            ),
        ),
        TurnRole::Impostor { hint } => {
            let hint = hint
                .as_deref()
                .map(|hint| format!(r#"<div class="hint">Hint: {}</div>"#, escape(hint)))
                .unwrap_or_default();
            ("impostor", format!("YOU ARE THE IMPOSTOR{hint}"))
        }
    };

    let body = format!(
        r#"<div class="player-card" style="background: {color};" data-color="{color}">
<div class="turn">Turn {turn} of {total}</div>
<h2 style="color: white;">{name}</h2>
</div>
<p class="notice">Press and hold the card to see your secret. Make sure nobody else is looking.</p>
<div id="secret" class="secret {kind}">{secret}</div>
<form method="post" action="/next">
<button type="submit">{next_label}</button>
</form>
<script>
const secret = document.getElementById('secret');
const show = (e) => {{ e.preventDefault(); secret.classList.add('revealed'); }};
const hide = () => setTimeout(() => secret.classList.remove('revealed'), 100);
secret.addEventListener('mousedown', show);
secret.addEventListener('touchstart', show);
['mouseup', 'mouseleave', 'touchend', 'touchcancel'].forEach((ev) => secret.addEventListener(ev, hide));
</script>"#,
        color = view.color,
        turn = view.turn_number,
        total = view.total_players,
        name = escape(&view.name),
        next_label = if last_turn { "See results" } else { "Next player" },
    );

    layout(&format!("Impostor - {}", view.name), &body)
}

pub fn results_page(view: &ResultsView, discussion_seconds: u32) -> Html<String> {
    let impostor_label = if view.impostor_count > 1 {
        "Impostors"
    } else {
        "Impostor"
    };
    let starting_speaker = view
        .starting_speaker
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| "nobody".to_string());

    let body = format!(
        r#"<h1>Time to discuss!</h1>
<div id="countdown">--:--</div>
<div class="result"><strong>Starts talking:</strong> {starting_speaker}</div>
<div class="result">{total} players, {count} {impostor_label_lower}</div>
<button type="button" id="reveal-button">Show {impostor_label} and secret word</button>
<div id="secret-results" class="result">
<h3>{impostor_label}</h3>
<p>{names}</p>
<h3>Secret word</h3>
<p>{word} ({category})</p>
</div>
<form method="post" action="/reset">
<button type="submit" class="secondary">New game</button>
</form>
<script>
let remaining = {discussion_seconds};
const display = document.getElementById('countdown');
const render = () => {{
  const m = String(Math.floor(remaining / 60)).padStart(2, '0');
  const s = String(remaining % 60).padStart(2, '0');
  display.textContent = m + ':' + s;
}};
render();
const timer = setInterval(() => {{
  remaining -= 1;
  if (remaining < 0) {{ clearInterval(timer); display.textContent = "Time's up!"; return; }}
  render();
}}, 1000);
document.getElementById('reveal-button').addEventListener('click', (e) => {{
  clearInterval(timer);
  document.getElementById('secret-results').classList.add('shown');
  e.target.style.display = 'none';
}});
</script>"#,
        total = view.total_players,
        count = view.impostor_count,
        impostor_label_lower = impostor_label.to_lowercase(),
        names = escape(&view.impostor_names.join(", ")),
        word = escape(&view.word),
        category = escape(&view.category),
    );

    layout("Impostor - Results", &body)
}
