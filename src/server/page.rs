/// Marker in [`FORM_HTML`] replaced with a fresh session id per page load.
pub const SESSION_PLACEHOLDER: &str = "__SESSION_ID__";

/// The form page with its session id filled in.
pub fn render_form(session_id: &str) -> String {
    FORM_HTML.replace(SESSION_PLACEHOLDER, session_id)
}

pub const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Dream Teller</title>
<style>
  :root {
    --bg: #0f0c1d; --panel: #1a1530; --border: #2f2750;
    --accent: #b48cff; --text: #ece8ff; --muted: #8d86aa;
    --font: 'Georgia', serif;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: var(--font); }
  main { max-width: 720px; margin: 48px auto; padding: 0 20px; }
  h1 { color: var(--accent); font-size: 32px; margin-bottom: 8px; }
  p.lead { color: var(--muted); margin-bottom: 24px; }
  .panel {
    background: var(--panel); border: 1px solid var(--border);
    border-radius: 8px; padding: 24px;
  }
  textarea {
    width: 100%; min-height: 160px; padding: 12px; resize: vertical;
    background: var(--bg); color: var(--text); border: 1px solid var(--border);
    border-radius: 6px; font: inherit;
  }
  fieldset { border: none; margin: 16px 0; display: flex; gap: 16px; }
  button {
    background: var(--accent); color: var(--bg); border: none; border-radius: 6px;
    padding: 10px 20px; font: inherit; cursor: pointer;
  }
  button:disabled { opacity: 0.4; cursor: not-allowed; }
  #story { white-space: pre-wrap; line-height: 1.6; margin: 16px 0; }
  .links a { color: var(--accent); display: block; margin: 4px 0; }
  .hidden { display: none; }
</style>
</head>
<body>
<main>
  <h1>Dream Teller</h1>
  <p class="lead">Describe a dream and we will turn it into a story for video or podcast.</p>

  <section id="input-panel" class="panel">
    <form id="dream-form">
      <textarea id="dream-text" placeholder="Last night I dreamt..."></textarea>
      <fieldset>
        <label><input type="radio" name="format" value="video" checked> Video</label>
        <label><input type="radio" name="format" value="podcast"> Podcast</label>
        <label><input type="checkbox" id="include-audio" checked> Include audio</label>
      </fieldset>
      <button type="submit" id="submit" disabled>Generate</button>
    </form>
  </section>

  <section id="result-panel" class="panel hidden">
    <h2>Your dream story</h2>
    <div id="story"></div>
    <div class="links" id="links"></div>
    <button type="button" id="again">Create another dream</button>
  </section>
</main>
<script>
  const state = { loading: false, result: null, sessionId: '__SESSION_ID__' };
  const text = document.getElementById('dream-text');
  const submit = document.getElementById('submit');
  const audio = document.getElementById('include-audio');

  function render() {
    submit.disabled = state.loading || text.value.trim() === '';
    submit.textContent = state.loading ? 'Generating...' : 'Generate';
    document.getElementById('input-panel').classList.toggle('hidden', state.result !== null);
    document.getElementById('result-panel').classList.toggle('hidden', state.result === null);
    if (state.result) {
      document.getElementById('story').textContent = state.result.generated_story;
      const links = document.getElementById('links');
      links.replaceChildren();
      for (const [label, url] of [['Watch video', state.result.video_url], ['Listen', state.result.audio_url]]) {
        if (!url) continue;
        const a = document.createElement('a');
        a.href = url; a.textContent = label; a.target = '_blank';
        links.appendChild(a);
      }
    }
  }

  text.addEventListener('input', render);

  document.getElementById('dream-form').addEventListener('submit', async (ev) => {
    ev.preventDefault();
    if (state.loading || text.value.trim() === '') return;
    state.loading = true;
    render();
    try {
      const resp = await fetch('/api/generate-dream', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          dream_text: text.value,
          format_type: document.querySelector('input[name=format]:checked').value,
          include_audio: audio.checked,
          session_id: state.sessionId,
        }),
      });
      if (!resp.ok) throw new Error('HTTP ' + resp.status);
      state.result = await resp.json();
    } catch (err) {
      console.error(err);
      alert('Failed to generate dream content. Please try again.');
    } finally {
      state.loading = false;
      render();
    }
  });

  document.getElementById('again').addEventListener('click', () => {
    state.result = null;
    text.value = '';
    render();
  });

  render();
</script>
</body>
</html>
"#;
