use crate::data::registry::DatasetRegistry;
use crate::server::api;
use crate::server::static_files;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn ok_json(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

pub fn route_request(method: &str, path: &str, registry: &DatasetRegistry) -> HttpResponse {
    if let Some(response) = static_files::try_serve_static(method, path) {
        return response;
    }
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/fields") => match api::fields_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/towns") => match api::towns_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/flat-types") => match api::flat_types_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/trends") => match api::trends_payload(path, registry) {
            Ok(payload) => ok_json(payload),
            Err(api::TrendsError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
            Err(api::TrendsError::Render(msg)) => {
                error_response(500, "Internal Server Error", &msg)
            }
        },
        ("GET", "/api/trends.csv") => match api::trends_csv_payload(path, registry) {
            Ok(payload) => HttpResponse {
                status_code: 200,
                status_text: "OK",
                content_type: "text/csv; charset=utf-8",
                body: payload,
            },
            Err(api::TrendsError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
            Err(api::TrendsError::Render(msg)) => {
                error_response(500, "Internal Server Error", &msg)
            }
        },
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Merlion Resale Trends</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 960px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    select { width: 100%; padding: 6px; box-sizing: border-box; }
    canvas { width: 100%; border: 1px solid #eee; border-radius: 6px; margin-top: 12px; }
    #legend { font-size: 0.9rem; color: #444; margin-top: 6px; }
    a { font-size: 0.9rem; }
  </style>
</head>
<body>
  <h1>Resale Price Trends</h1>
  <p>Median resale prices per quarter, by town. Pick a flat type and towns.</p>

  <div class="card">
    <label for="flat-type">Flat type</label>
    <select id="flat-type"></select>
    <label for="towns">Towns (multi-select)</label>
    <select id="towns" multiple size="8"></select>
    <p><a id="csv-link" href="/api/trends.csv">Download CSV</a></p>
  </div>

  <canvas id="chart" width="920" height="360"></canvas>
  <div id="legend"></div>

  <script>
    const flatTypeEl = document.getElementById('flat-type');
    const townsEl = document.getElementById('towns');
    const canvas = document.getElementById('chart');
    const legendEl = document.getElementById('legend');
    const csvLink = document.getElementById('csv-link');
    const colors = ['#c00', '#06c', '#090', '#c60', '#609', '#066', '#933', '#369'];

    function trendsQuery() {
      const towns = Array.from(townsEl.selectedOptions).map(o => o.value);
      return 'flat_type=' + encodeURIComponent(flatTypeEl.value)
        + '&towns=' + encodeURIComponent(towns.join(','));
    }

    function draw(result) {
      const ctx = canvas.getContext('2d');
      ctx.clearRect(0, 0, canvas.width, canvas.height);
      const prices = result.series.flatMap(s => s.values.filter(v => v !== null));
      if (!prices.length) { legendEl.textContent = 'No data for this selection.'; return; }
      const min = Math.min(...prices), max = Math.max(...prices);
      const x = i => 40 + i * (canvas.width - 60) / Math.max(1, result.quarters.length - 1);
      const y = v => canvas.height - 24 - (v - min) * (canvas.height - 48) / Math.max(1, max - min);
      result.series.forEach((s, si) => {
        ctx.strokeStyle = colors[si % colors.length];
        ctx.beginPath();
        let started = false;
        s.values.forEach((v, i) => {
          if (v === null) return; // connectNulls: keep the path open across gaps
          if (started) { ctx.lineTo(x(i), y(v)); } else { ctx.moveTo(x(i), y(v)); started = true; }
        });
        ctx.stroke();
      });
      legendEl.innerHTML = result.legend
        .map((name, i) => '<span style="color:' + colors[i % colors.length] + '">&#9632; ' + name + '</span>')
        .join(' ');
    }

    async function refresh() {
      const query = trendsQuery();
      csvLink.href = '/api/trends.csv?' + query;
      const response = await fetch('/api/trends?' + query);
      if (response.ok) draw(await response.json());
    }

    async function init() {
      const flatTypes = (await (await fetch('/api/flat-types')).json()).flat_types;
      const towns = (await (await fetch('/api/towns')).json()).towns;
      flatTypeEl.innerHTML = flatTypes.map(t => '<option>' + t + '</option>').join('');
      townsEl.innerHTML = towns.map(t => '<option>' + t + '</option>').join('');
      flatTypeEl.addEventListener('change', refresh);
      townsEl.addEventListener('change', refresh);
      refresh();
    }
    init();
  </script>
</body>
</html>
"#
    .to_string()
}
