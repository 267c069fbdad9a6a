use guild_results_app::{
    domain::result::{AnnotatedGameResult, Outcome},
    workflow::guild::details::GuildDetails,
};

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn outcome_cell(result: &AnnotatedGameResult) -> String {
    match result.outcome() {
        Outcome::Win => format!(r#"<td style="color: red">Win (+{})</td>"#, result.diff),
        Outcome::Lose => format!(r#"<td style="color: skyblue">Lose ({})</td>"#, result.diff),
        Outcome::Draw => "<td>Draw</td>".to_string(),
    }
}

fn result_rows(results: &[AnnotatedGameResult]) -> String {
    let mut rows = String::new();
    for result in results {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} - {}</td>{}</tr>",
            result.idx,
            escape(&result.result.enemy),
            escape(&result.result.date),
            result.result.score,
            result.result.enemy_score,
            outcome_cell(result),
        ));
    }
    rows
}

/// Server-rendered results page; `/static/index.js` refreshes the table when
/// the filters change.
pub fn render_details(details: &GuildDetails) -> String {
    let name = escape(&details.name);
    let id = details.guild_id;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{name}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css">
</head>
<body class="container py-4">
<h1>{name}</h1>
<form class="row g-2 mb-3" onsubmit="redirect(); return false;">
  <div class="col-auto"><input id="guildId" class="form-control" type="text" inputmode="numeric" value="{id}"></div>
  <div class="col-auto"><button class="btn btn-secondary" type="submit">Go</button></div>
</form>
<div class="row g-2 mb-3">
  <div class="col-auto"><input id="teamName" class="form-control" type="text" placeholder="Enemy name"></div>
  <div class="col-auto">
    <select id="winOrLoseOption" class="form-select" onchange="refreshTable()">
      <option value="all">All</option>
      <option value="win">Win</option>
      <option value="lose">Lose</option>
      <option value="draw">Draw</option>
    </select>
  </div>
  <div class="col-auto"><a class="btn btn-outline-primary" href="/api/guild/results/file/{id}">Download CSV</a></div>
</div>
<table id="resultTable" class="table table-striped">
<thead><tr><th>#</th><th>Enemy</th><th>Date</th><th>Score</th><th>Result</th></tr></thead>
<tbody id="resultTableBody">{rows}</tbody>
</table>
<script src="/static/util.js"></script>
<script src="/static/index.js"></script>
</body>
</html>
"#,
        name = name,
        id = id,
        rows = result_rows(&details.results),
    )
}
