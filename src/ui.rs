use crate::models::{MessageView, StatsResponse};
use crate::widgets::StatMode;
use std::fmt::Write;

pub struct IndexView {
    pub stats: StatsResponse,
    pub messages: Vec<MessageView>,
    pub stat_mode: StatMode,
}

pub fn render_index(view: &IndexView) -> String {
    INDEX_HTML
        .replace("{{STAT_MODE}}", view.stat_mode.as_str())
        .replace("{{USERS}}", &view.stats.users.to_string())
        .replace("{{MESSAGES}}", &view.stats.messages.to_string())
        .replace("{{LIKES}}", &view.stats.likes.to_string())
        .replace("{{TIMELINE}}", &render_timeline(&view.messages))
}

fn render_timeline(messages: &[MessageView]) -> String {
    if messages.is_empty() {
        return r#"<li class="empty">No warbles yet.</li>"#.to_string();
    }

    let mut html = String::new();
    for message in messages {
        let _ = write!(
            html,
            r##"<li class="message">
          <div class="meta"><strong>@{user}</strong><span>{time}</span></div>
          <p>{text}</p>
          <a href="#" class="like" id="{id}">&#9829; <span class="like-count">{likes}</span></a>
        </li>
        "##,
            user = escape_html(&message.username),
            time = escape_html(&message.created_at),
            text = escape_html(&message.text),
            id = message.id,
            likes = message.likes,
        );
    }
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Warbler</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --ink: #1f2933;
      --accent: #e0245e;
      --muted: #7b8794;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Helvetica Neue", Arial, sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(680px, 100%);
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
    }

    .stat {
      background: var(--card);
      border-radius: 14px;
      padding: 14px;
      border: 2px solid transparent;
      cursor: pointer;
    }

    .stat.active {
      border-color: var(--accent);
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .search {
      position: relative;
    }

    #search {
      width: 100%;
      padding: 12px 14px;
      border-radius: 999px;
      border: 1px solid #cbd2d9;
      font-size: 1rem;
    }

    #search-suggestions {
      position: absolute;
      left: 0;
      right: 0;
      margin: 4px 0 0;
      padding: 0;
      list-style: none;
      background: var(--card);
      border-radius: 12px;
      box-shadow: 0 8px 24px rgba(31, 41, 51, 0.15);
      z-index: 2;
    }

    #search-suggestions li {
      padding: 8px 14px;
      cursor: pointer;
    }

    #search-suggestions li:hover {
      background: var(--bg);
    }

    #messages {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .message {
      background: var(--card);
      border-radius: 14px;
      padding: 14px 16px;
    }

    .message .meta {
      display: flex;
      justify-content: space-between;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .like {
      color: var(--accent);
      text-decoration: none;
      font-weight: 600;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }
  </style>
</head>
<body data-stat-mode="{{STAT_MODE}}">
  <main class="app">
    <h1>Warbler</h1>

    <section class="panel">
      <div class="stat" id="stat-users">
        <span class="label">Users</span>
        <span class="value">{{USERS}}</span>
      </div>
      <div class="stat" id="stat-messages">
        <span class="label">Warbles</span>
        <span class="value">{{MESSAGES}}</span>
      </div>
      <div class="stat" id="stat-likes">
        <span class="label">Likes</span>
        <span class="value" id="likes-total">{{LIKES}}</span>
      </div>
    </section>

    <section class="search">
      <input id="search" type="search" placeholder="Search users" autocomplete="off" />
      <ul id="search-suggestions" hidden></ul>
    </section>

    <div class="status" id="status"></div>

    <ul id="messages">
        {{TIMELINE}}
    </ul>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const likesTotalEl = document.getElementById('likes-total');
    const messagesEl = document.getElementById('messages');
    const searchEl = document.getElementById('search');
    const suggestionsEl = document.getElementById('search-suggestions');
    const statEls = Array.from(document.querySelectorAll('.stat'));
    const exclusiveStats = document.body.dataset.statMode === 'exclusive';
    const MIN_LENGTH = 1;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const like = async (messageId) => {
      const res = await fetch(`/messages/${encodeURIComponent(messageId)}/add`, { method: 'POST' });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Like failed');
      }
      return res.json();
    };

    messagesEl.addEventListener('click', (event) => {
      const target = event.target.closest('.like');
      if (!target || !messagesEl.contains(target)) {
        return;
      }
      event.preventDefault();
      if (!target.id) {
        setStatus('Message has no id', 'error');
        return;
      }
      like(target.id)
        .then((data) => {
          target.querySelector('.like-count').textContent = data.likes;
          likesTotalEl.textContent = data.total_likes;
          target.classList.toggle('liked', data.liked);
        })
        .catch((err) => {
          console.warn('like failed', err);
          setStatus(err.message, 'error');
        });
    });

    const labelOf = (item) => (typeof item === 'string' ? item : item.label || item.value);
    const valueOf = (item) => (typeof item === 'string' ? item : item.value || item.label);

    const attachAutocomplete = (source) => {
      const close = () => {
        suggestionsEl.hidden = true;
        suggestionsEl.replaceChildren();
      };

      searchEl.addEventListener('input', () => {
        const term = searchEl.value;
        if (term.length < MIN_LENGTH) {
          close();
          return;
        }
        const needle = term.toLowerCase();
        const matches = source.filter((item) => labelOf(item).toLowerCase().includes(needle));
        suggestionsEl.replaceChildren(
          ...matches.map((item) => {
            const li = document.createElement('li');
            li.textContent = labelOf(item);
            li.addEventListener('click', () => {
              searchEl.value = valueOf(item);
              close();
            });
            return li;
          })
        );
        suggestionsEl.hidden = matches.length === 0;
      });

      searchEl.addEventListener('blur', () => setTimeout(close, 150));
    };

    const loadSuggestions = async () => {
      const res = await fetch('/autocomplete');
      if (!res.ok) {
        throw new Error('Unable to load suggestions');
      }
      attachAutocomplete(await res.json());
    };

    statEls.forEach((el) => {
      el.addEventListener('click', () => {
        if (exclusiveStats) {
          statEls.forEach((other) => other.classList.remove('active'));
        }
        el.classList.add('active');
      });
    });

    loadSuggestions().catch((err) => {
      console.warn('autocomplete unavailable', err);
      setStatus(err.message, 'error');
    });
  </script>
</body>
</html>
"#;
