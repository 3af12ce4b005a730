use crate::stats::Stats;

pub fn render_index(date: &str, stats: &Stats) -> String {
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{LIMIT}}", &stats.limit.to_string())
        .replace("{{TOTAL}}", &stats.total.to_string())
        .replace("{{CONSUMED}}", &stats.consumed.to_string())
        .replace("{{BURNED}}", &stats.burned.to_string())
        .replace("{{REMAINING}}", &stats.remaining.to_string())
        .replace("{{PROGRESS}}", &format!("{:.1}", stats.progress_percent))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Calorie Tracker</title>
  <style>
    :root {
      --bg: #f4f7f2;
      --ink: #24302a;
      --card: #ffffff;
      --accent: #2f8f5b;
      --accent-2: #3d5a80;
      --danger: #c8553d;
      --shadow: 0 16px 40px rgba(36, 48, 42, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 28px 16px 48px;
    }

    .app { width: min(960px, 100%); margin: 0 auto; display: grid; gap: 22px; }
    header { display: flex; justify-content: space-between; align-items: baseline; flex-wrap: wrap; gap: 8px; }
    h1 { margin: 0; font-size: 2rem; }
    .subtitle { margin: 0; color: #5b6660; }

    .panel { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 12px; }
    .stat { background: var(--card); border-radius: 14px; box-shadow: var(--shadow); padding: 14px; text-align: center; }
    .stat .value { font-size: 1.8rem; font-weight: 600; }
    .stat .label { color: #5b6660; font-size: 0.9rem; }
    .stat.over { background: var(--danger); color: #fff; }
    .stat.over .label { color: #fde9e4; }

    .progress { height: 18px; background: #dde5df; border-radius: 9px; overflow: hidden; }
    .progress .bar { height: 100%; background: var(--accent); transition: width 200ms ease; }
    .progress .bar.over { background: var(--danger); }

    .columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 18px; }
    .column { display: grid; gap: 10px; align-content: start; }
    form { display: flex; gap: 8px; flex-wrap: wrap; }
    input { padding: 8px 10px; border: 1px solid #c4cec7; border-radius: 8px; font: inherit; }
    button { padding: 8px 14px; border: 0; border-radius: 8px; background: var(--accent); color: #fff; font: inherit; cursor: pointer; }
    button.secondary { background: var(--accent-2); }
    button.danger { background: var(--danger); }
    .item { display: flex; justify-content: space-between; align-items: center; background: var(--card); border-radius: 10px; box-shadow: var(--shadow); padding: 10px 12px; }
    .item .cal { font-weight: 600; margin: 0 10px; }
    .toolbar { display: flex; gap: 10px; flex-wrap: wrap; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Calorie Tracker</h1>
      <p class="subtitle" id="date">{{DATE}}</p>
    </header>

    <section class="panel">
      <div class="stat"><div class="value" id="limit">{{LIMIT}}</div><div class="label">Daily limit</div></div>
      <div class="stat"><div class="value" id="total">{{TOTAL}}</div><div class="label">Gain / loss</div></div>
      <div class="stat"><div class="value" id="consumed">{{CONSUMED}}</div><div class="label">Consumed</div></div>
      <div class="stat"><div class="value" id="burned">{{BURNED}}</div><div class="label">Burned</div></div>
      <div class="stat" id="remaining-card"><div class="value" id="remaining">{{REMAINING}}</div><div class="label">Remaining</div></div>
    </section>

    <div class="progress"><div class="bar" id="progress" style="width: {{PROGRESS}}%"></div></div>

    <div class="toolbar">
      <form id="limit-form">
        <input id="limit-input" placeholder="New daily limit" inputmode="numeric" />
        <button class="secondary" type="submit">Set limit</button>
      </form>
      <button class="danger" id="reset">Reset day</button>
    </div>

    <section class="columns">
      <div class="column">
        <h2>Meals</h2>
        <form data-kind="meals">
          <input name="name" placeholder="Meal name" />
          <input name="calories" placeholder="Calories" inputmode="numeric" />
          <button type="submit">Add meal</button>
        </form>
        <input class="filter" data-kind="meals" placeholder="Filter meals" />
        <div id="meals-items"></div>
      </div>
      <div class="column">
        <h2>Workouts</h2>
        <form data-kind="workouts">
          <input name="name" placeholder="Workout name" />
          <input name="calories" placeholder="Calories" inputmode="numeric" />
          <button type="submit">Add workout</button>
        </form>
        <input class="filter" data-kind="workouts" placeholder="Filter workouts" />
        <div id="workouts-items"></div>
      </div>
    </section>
  </main>

  <script>
    const renderStats = (stats) => {
      for (const key of ['limit', 'total', 'consumed', 'burned', 'remaining']) {
        document.getElementById(key).textContent = stats[key];
      }
      document.getElementById('remaining-card').classList.toggle('over', stats.over_limit);
      const bar = document.getElementById('progress');
      bar.style.width = `${stats.progress_percent}%`;
      bar.classList.toggle('over', stats.over_limit);
    };

    const send = async (method, url, body) => {
      const response = await fetch(url, {
        method,
        headers: body ? { 'Content-Type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined,
      });
      if (!response.ok) {
        alert(await response.text());
        return null;
      }
      return response.json();
    };

    const renderItem = (kind, entry) => {
      const item = document.createElement('div');
      item.className = 'item';
      item.dataset.id = entry.id;
      const name = document.createElement('span');
      name.textContent = entry.name;
      const cal = document.createElement('span');
      cal.className = 'cal';
      cal.textContent = entry.calories;
      const remove = document.createElement('button');
      remove.className = 'danger';
      remove.textContent = 'x';
      remove.addEventListener('click', async () => {
        if (!confirm('Are you sure you want to delete the item?')) return;
        const result = await send('DELETE', `/api/${kind}/${entry.id}`);
        if (result) {
          item.remove();
          renderStats(result.stats);
        }
      });
      item.append(name, cal, remove);
      document.getElementById(`${kind}-items`).appendChild(item);
    };

    const loadItems = async (kind, filter = '') => {
      const entries = await send('GET', `/api/${kind}?filter=${encodeURIComponent(filter)}`);
      document.getElementById(`${kind}-items`).innerHTML = '';
      (entries || []).forEach((entry) => renderItem(kind, entry));
    };

    document.querySelectorAll('form[data-kind]').forEach((form) => {
      form.addEventListener('submit', async (evt) => {
        evt.preventDefault();
        const kind = form.dataset.kind;
        const name = form.elements.name.value;
        const calories = form.elements.calories.value;
        const change = await send('POST', `/api/${kind}`, { name, calories });
        if (change) {
          form.reset();
          renderStats(change.stats);
          await loadItems(kind, document.querySelector(`.filter[data-kind="${kind}"]`).value);
        }
      });
    });

    document.querySelectorAll('.filter').forEach((input) => {
      input.addEventListener('input', () => loadItems(input.dataset.kind, input.value));
    });

    document.getElementById('limit-form').addEventListener('submit', async (evt) => {
      evt.preventDefault();
      const input = document.getElementById('limit-input');
      const change = await send('PUT', '/api/limit', { limit: input.value });
      if (change) {
        input.value = '';
        renderStats(change.stats);
      }
    });

    document.getElementById('reset').addEventListener('click', async () => {
      if (!confirm('Are you sure about resetting the day?')) return;
      const change = await send('POST', '/api/reset');
      if (change) {
        document.querySelectorAll('.filter').forEach((input) => { input.value = ''; });
        await Promise.all([loadItems('meals'), loadItems('workouts')]);
        renderStats(change.stats);
      }
    });

    send('GET', '/api/stats').then((stats) => stats && renderStats(stats));
    loadItems('meals');
    loadItems('workouts');
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerState;
    use crate::stats::build_stats;

    #[test]
    fn index_fills_every_placeholder() {
        let html = render_index("2026-10-16", &build_stats(&LedgerState::default()));
        assert!(!html.contains("{{"));
        assert!(html.contains("2026-10-16"));
        assert!(html.contains(r#"id="limit">2000<"#));
        assert!(html.contains("width: 0.0%"));
    }
}
