use crate::models::{Goal, Preferences, Theme};

pub fn render_index(goal: Option<&Goal>, preferences: &Preferences) -> String {
    let title = goal.map(|goal| goal.name.as_str()).unwrap_or("Savings Goal");
    let theme = match preferences.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
        Theme::System => "system",
    };
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{THEME}}", theme)
        .replace("{{ACCENT}}", &escape_html(&preferences.accent_color))
        .replace("{{SHOW_CUMULATIVE}}", if preferences.show_cumulative { "true" } else { "false" })
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Savings Tracker</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --ink: #23221f;
      --muted: #7a746d;
      --card: #ffffff;
      --line: rgba(35, 34, 31, 0.1);
      --accent: {{ACCENT}};
      --gain: #2d7a4b;
      --loss: #c63b2b;
    }

    [data-theme="dark"] {
      --bg: #17181b;
      --ink: #ecebe7;
      --muted: #9b968f;
      --card: #222327;
      --line: rgba(236, 235, 231, 0.12);
    }

    @media (prefers-color-scheme: dark) {
      [data-theme="system"] {
        --bg: #17181b;
        --ink: #ecebe7;
        --muted: #9b968f;
        --card: #222327;
        --line: rgba(236, 235, 231, 0.12);
      }
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", system-ui, sans-serif;
      padding: 28px 16px 48px;
    }

    main {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    h1 { margin: 0; font-size: clamp(1.6rem, 4vw, 2.3rem); }

    select, input, button {
      font: inherit;
      color: inherit;
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 10px;
      padding: 8px 10px;
    }

    button { cursor: pointer; }
    button.primary { background: var(--accent); color: white; border: none; }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 12px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 16px;
    }

    .card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .card .value { font-size: 1.5rem; font-weight: 600; margin-top: 6px; }

    .bar { height: 10px; border-radius: 999px; background: var(--line); overflow: hidden; }
    .bar span { display: block; height: 100%; background: var(--accent); width: 0; }

    #chart { width: 100%; height: 240px; display: block; }
    .chart-line { fill: none; stroke: var(--accent); stroke-width: 3; }
    .chart-grid { stroke: var(--line); }
    .chart-label { fill: var(--muted); font-size: 11px; }

    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--line); }
    td input { width: 120px; }
    .gain { color: var(--gain); }
    .loss { color: var(--loss); }

    .actions { display: flex; flex-wrap: wrap; gap: 8px; }
    .status { min-height: 1.2em; color: var(--muted); }
    .status[data-type="error"] { color: var(--loss); }
    .status[data-type="ok"] { color: var(--gain); }
  </style>
</head>
<body>
  <main>
    <header>
      <h1 id="goal-name">{{TITLE}}</h1>
      <div class="actions">
        <select id="goal-select" aria-label="Goal"></select>
        <button id="new-goal" type="button">New goal</button>
        <button id="toggle-view" type="button">Weekly view</button>
      </div>
    </header>

    <section class="cards">
      <div class="card"><div class="label">Saved</div><div class="value" id="saved">0</div></div>
      <div class="card"><div class="label">Target</div><div class="value" id="target">0</div></div>
      <div class="card"><div class="label">Remaining</div><div class="value" id="remaining">0</div></div>
      <div class="card"><div class="label">Streak</div><div class="value" id="streak">0 / 0</div></div>
      <div class="card"><div class="label">Projected finish</div><div class="value" id="forecast">--</div></div>
    </section>

    <div class="bar" aria-label="Progress"><span id="progress"></span></div>

    <section class="card">
      <svg id="chart" viewBox="0 0 600 240" role="img" aria-label="Savings chart"></svg>
    </section>

    <section class="card">
      <table>
        <thead><tr><th>Week</th><th>Dates</th><th>Profit</th><th>Cumulative</th></tr></thead>
        <tbody id="weeks"></tbody>
      </table>
    </section>

    <section class="actions">
      <a id="export-json" href="#"><button type="button">Export JSON</button></a>
      <a id="export-csv" href="#"><button type="button">Export CSV</button></a>
      <label><button type="button" id="import-btn">Import JSON</button>
        <input id="import-file" type="file" accept="application/json" hidden /></label>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    let showCumulative = {{SHOW_CUMULATIVE}};
    let goalId = null;
    let current = null;

    const setStatus = (message, type) => {
      $('status').textContent = message;
      $('status').dataset.type = type || '';
    };

    const money = (value) => Number(value).toLocaleString(undefined, { maximumFractionDigits: 2 });

    const api = async (path, options = {}) => {
      const res = await fetch(path, options);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const renderChart = (points) => {
      const chart = $('chart');
      if (!points.length) {
        chart.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No weeks yet</text>';
        return;
      }
      const width = 600, height = 240, padX = 48, padY = 30, top = 16;
      const values = points.map((p) => Number(showCumulative ? p.cumulative : p.profit));
      let min = Math.min(0, ...values), max = Math.max(0, ...values);
      if (min === max) { max += 1; }
      const xStep = points.length > 1 ? (width - padX * 2) / (points.length - 1) : 0;
      const y = (v) => height - padY - ((v - min) * (height - top - padY)) / (max - min);
      const x = (i) => padX + i * xStep;
      let svg = '';
      for (let i = 0; i <= 4; i += 1) {
        const v = min + ((max - min) * i) / 4;
        svg += `<line class="chart-grid" x1="${padX}" x2="${width - padX}" y1="${y(v)}" y2="${y(v)}" />`;
        svg += `<text class="chart-label" x="${padX - 8}" y="${y(v) + 4}" text-anchor="end">${money(v)}</text>`;
      }
      svg += `<path class="chart-line" d="${values.map((v, i) => `${i ? 'L' : 'M'} ${x(i)} ${y(v)}`).join(' ')}" />`;
      const every = Math.ceil(points.length / 12);
      points.forEach((p, i) => {
        if (i % every === 0) {
          svg += `<text class="chart-label" x="${x(i)}" y="${height - 8}" text-anchor="middle">W${p.week}</text>`;
        }
      });
      chart.innerHTML = svg;
    };

    const renderForecast = (prediction) => {
      if (prediction.status === 'projected') {
        return `${prediction.targetDate} (${prediction.confidence})`;
      }
      return prediction.reason === 'start_saving' ? 'Start saving' : 'Needs profit';
    };

    const renderWeeks = (weeks) => {
      const body = $('weeks');
      body.innerHTML = '';
      weeks.forEach((week) => {
        const row = document.createElement('tr');
        const cell = (text, className) => {
          const td = document.createElement('td');
          td.textContent = text;
          if (className) { td.className = className; }
          row.appendChild(td);
          return td;
        };
        cell(week.displayName || `Week ${week.week}`);
        cell(`${week.startDate || ''} – ${week.endDate || ''}`);
        const input = document.createElement('input');
        input.inputMode = 'decimal';
        input.placeholder = '0';
        input.value = week.isFilled ? week.profit : '';
        cell('').appendChild(input);
        cell(money(week.cumulative), Number(week.profit) < 0 ? 'loss' : 'gain');
        input.addEventListener('change', (event) => {
          saveWeek(week.week, event.target.value).catch((err) => setStatus(err.message, 'error'));
        });
        body.appendChild(row);
      });
    };

    const render = (data) => {
      current = data;
      const { goal, summary } = data;
      $('goal-name').textContent = goal.name;
      $('saved').textContent = money(summary.totalSaved);
      $('target').textContent = money(summary.target);
      $('remaining').textContent = money(summary.remaining);
      $('streak').textContent = `${summary.streaks.currentStreak} / ${summary.streaks.bestStreak}`;
      $('forecast').textContent = renderForecast(summary.prediction);
      $('progress').style.width = `${summary.progressPercent}%`;
      $('export-json').href = `/api/goals/${goal.id}/export.json`;
      $('export-csv').href = `/api/goals/${goal.id}/export.csv`;
      $('toggle-view').textContent = showCumulative ? 'Weekly view' : 'Cumulative view';
      renderChart(summary.chart);
      renderWeeks(goal.weeks.slice(0, goal.visibleWeeks));
    };

    const saveWeek = async (week, profit) => {
      render(await api(`/api/goals/${goalId}/weeks/${week}`, {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ profit })
      }));
      setStatus('Saved', 'ok');
    };

    const loadGoals = async () => {
      const goals = await api('/api/goals');
      const select = $('goal-select');
      select.replaceChildren(...goals.map((g) => new Option(g.name, g.id, g.active, g.active)));
      const active = goals.find((g) => g.active) || goals[0];
      goalId = active ? active.id : null;
      if (goalId) {
        render(await api(`/api/goals/${goalId}`));
      }
    };

    const pollNotifications = async () => {
      const notices = await api('/api/notifications');
      notices.forEach((notice) => setStatus(notice.message, 'info'));
    };

    $('goal-select').addEventListener('change', async (event) => {
      await api(`/api/goals/${event.target.value}/activate`, { method: 'POST' });
      loadGoals().catch((err) => setStatus(err.message, 'error'));
    });

    $('new-goal').addEventListener('click', async () => {
      const name = prompt('Goal name');
      if (!name) { return; }
      const target = prompt('Target amount', '280000') || '';
      try {
        const created = await api('/api/goals', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ name, target })
        });
        await api(`/api/goals/${created.goal.id}/activate`, { method: 'POST' });
        await loadGoals();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    $('toggle-view').addEventListener('click', async () => {
      showCumulative = !showCumulative;
      const prefs = await api('/api/preferences');
      await api('/api/preferences', {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ ...prefs, showCumulative })
      }).catch((err) => setStatus(err.message, 'error'));
      if (current) { render(current); }
    });

    $('import-btn').addEventListener('click', () => $('import-file').click());
    $('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file || !goalId) { return; }
      try {
        render(await api(`/api/goals/${goalId}/import`, { method: 'POST', body: await file.text() }));
        setStatus('Imported', 'ok');
      } catch (err) {
        setStatus(`Import failed: ${err.message}`, 'error');
      }
      event.target.value = '';
    });

    loadGoals().catch((err) => setStatus(err.message, 'error'));
    setInterval(() => pollNotifications().catch(() => {}), 30000);
  </script>
</body>
</html>
"##;
