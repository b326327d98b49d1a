use std::fmt::Write;

use crate::{
  os::{OsCategory, SelectionMode},
  session::Session,
};

const TITLE: &str = "DATA OS installation Command Helper";
const UNDETECTED: &str = "Your OS could not be detected.";

const SCRIPT: &str = r#"
(() => {
  const proto = location.protocol === "https:" ? "wss:" : "ws:";
  const select = document.getElementById("os-select");
  const ws = new WebSocket(`${proto}//${location.host}/ws?os=${encodeURIComponent(select.value)}`);
  let generation = 0;

  const send = (event) => {
    if (ws.readyState !== WebSocket.OPEN) return false;
    ws.send(JSON.stringify(event));
    return true;
  };

  const render = (snap) => {
    const out = document.getElementById("commands");
    out.replaceChildren();
    if (snap.effective === "Unknown") {
      const p = document.createElement("p");
      p.className = "undetected";
      p.textContent = "Your OS could not be detected.";
      out.append(p);
      return;
    }
    const h2 = document.createElement("h2");
    h2.textContent = `${snap.effective} Commands`;
    out.append(h2);
    snap.commands.forEach((cmd, idx) => {
      const card = document.createElement("div");
      card.className = "card";
      if (cmd.description) {
        const p = document.createElement("p");
        p.textContent = `${idx + 1}. ${cmd.description}`;
        card.append(p);
      }
      const pre = document.createElement("pre");
      pre.textContent = cmd.command;
      const button = document.createElement("button");
      button.className = "copy";
      button.dataset.index = idx;
      button.textContent = "Copy";
      card.append(pre, button);
      out.append(card);
    });
  };

  const feedback = (copied) => {
    document.querySelectorAll("button.copy").forEach((b) => {
      b.textContent = Number(b.dataset.index) === copied ? "Copied!" : "Copy";
    });
  };

  ws.onmessage = (msg) => {
    const event = JSON.parse(msg.data);
    if (event.type === "commands") render(event);
    else if (event.type === "copy_feedback") feedback(event.copied);
  };

  select.addEventListener("change", () => {
    generation += 1;
    if (!send({ type: "select", os: select.value })) {
      location.search = `?os=${encodeURIComponent(select.value)}`;
    }
  });

  document.getElementById("commands").addEventListener("click", (e) => {
    const button = e.target.closest("button.copy");
    if (!button) return;
    const index = Number(button.dataset.index);
    const text = button.parentElement.querySelector("pre").textContent;
    const issued = generation;
    navigator.clipboard
      .writeText(text)
      .then(() => {
        if (issued !== generation) return;
        feedback(index);
        send({ type: "copied", index, ok: true });
      })
      .catch(() => {
        if (issued !== generation) return;
        send({ type: "copied", index, ok: false });
      });
  });
})();
"#;

/// Escapes text so the browser displays it byte for byte.
pub fn escape(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}

fn option_value(selection: SelectionMode) -> &'static str {
  match selection {
    SelectionMode::Auto => "auto",
    SelectionMode::Explicit(OsCategory::Windows) => "windows",
    SelectionMode::Explicit(OsCategory::Macos) => "macos",
    SelectionMode::Explicit(OsCategory::Linux) => "linux",
    SelectionMode::Explicit(OsCategory::Unknown) => "unknown",
  }
}

fn render_selector(out: &mut String, session: &Session) -> std::fmt::Result {
  let auto = (SelectionMode::Auto, format!("Auto ({})", session.detected()));
  let options = std::iter::once(auto).chain(
    OsCategory::ALL
      .into_iter()
      .filter(|os| os.is_known())
      .map(|os| (SelectionMode::Explicit(os), os.label().to_owned())),
  );

  writeln!(out, r#"<label for="os-select">Operating System</label>"#)?;
  writeln!(out, r#"<select id="os-select">"#)?;
  for (selection, label) in options {
    let selected = if selection == session.selection() {
      " selected"
    } else {
      ""
    };
    writeln!(
      out,
      r#"<option value="{}"{selected}>{}</option>"#,
      option_value(selection),
      escape(&label)
    )?;
  }
  writeln!(out, "</select>")
}

fn render_commands(out: &mut String, session: &Session) -> std::fmt::Result {
  let effective = session.effective();
  if !effective.is_known() {
    return writeln!(out, r#"<p class="undetected">{UNDETECTED}</p>"#);
  }

  writeln!(out, "<h2>{effective} Commands</h2>")?;
  for (idx, cmd) in session.commands().iter().enumerate() {
    writeln!(out, r#"<div class="card">"#)?;
    if let Some(description) = &cmd.description {
      writeln!(out, "<p>{}. {}</p>", idx + 1, escape(description))?;
    }
    writeln!(out, "<pre>{}</pre>", escape(&cmd.command))?;
    let label = if session.copy_feedback().copied() == Some(idx) {
      "Copied!"
    } else {
      "Copy"
    };
    writeln!(out, r#"<button class="copy" data-index="{idx}">{label}</button>"#)?;
    writeln!(out, "</div>")?;
  }
  Ok(())
}

pub fn render(session: &Session) -> String {
  let mut out = String::new();
  // Writing into a String cannot fail.
  let _ = render_into(&mut out, session);
  out
}

fn render_into(out: &mut String, session: &Session) -> std::fmt::Result {
  writeln!(out, "<!doctype html>")?;
  writeln!(out, r#"<html lang="en"><head><meta charset="utf-8">"#)?;
  writeln!(out, "<title>{TITLE}</title>")?;
  writeln!(
    out,
    "<style>body{{font-family:sans-serif;max-width:48rem;margin:4rem auto}}\
     .card{{border:1px solid #ddd;border-radius:.75rem;padding:1rem;margin:1rem 0}}\
     pre{{background:#f4f4f5;padding:.75rem;overflow-x:auto}}</style>"
  )?;
  writeln!(out, "</head><body>")?;
  writeln!(out, "<h1>{TITLE}</h1>")?;
  writeln!(
    out,
    "<p>Automatically detects your operating system and replaces architecture placeholders \
     accordingly. If detection fails, select your OS manually and copy the commands.</p>"
  )?;
  render_selector(out, session)?;
  writeln!(out, r#"<div id="commands">"#)?;
  render_commands(out, session)?;
  writeln!(out, "</div>")?;
  writeln!(out, "<script>{SCRIPT}</script>")?;
  writeln!(out, "</body></html>")
}
