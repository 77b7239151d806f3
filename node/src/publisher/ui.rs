use url::form_urlencoded;

/// Which resource a page is rendered for
#[derive(Clone, Copy, Debug)]
pub struct PageTarget<'a> {
    /// Singular resource prefix, `contract`, `abi`, `instance` or `gateway`
    pub prefix: &'a str,
    pub id: &'a str,
    pub from: Option<&'a str>,
    /// Resource can deploy new instances
    pub is_factory: bool,
    pub factory_only: bool,
}

const FACTORY_HELP: &'static str = r#"<li><code>POST</code> against <code>/</code> (the constructor) deploys a new instance of the contract
          <ul><li>Each deployed instance gets its own API, scoped to the contract address</li></ul></li>"#;

const METHODS_HELP: &'static str = r#"<li><code>GET</code> actions never write to the chain, even for methods that update state</li>
          <li><code>POST</code> actions against <code>/subscribe</code> paths marked <code>[event]</code> add subscriptions to event streams
          <ul><li>Configure event streams first via the <code>/eventstreams</code> API</li></ul></li>
          <li>Numbers are encoded as strings, byte arrays and addresses as <code>0x</code> prefixed hex</li>"#;

/// Browsable API page loading the resource's descriptor
pub fn render_page(base_url: &str, target: PageTarget<'_>) -> String {
    let id: String = form_urlencoded::byte_serialize(target.id.as_bytes()).collect();
    let from_query = target
        .from
        .filter(|from| !from.is_empty())
        .map(|from| format!("&from={}", form_urlencoded::byte_serialize(from.as_bytes()).collect::<String>()))
        .unwrap_or_default();
    let factory_query = if target.factory_only { "&factory" } else { "" };
    let spec_url = format!(
        "{}/{}s/{}?swagger{}{}",
        base_url, target.prefix, id, factory_query, from_query
    );
    let download_url = format!("{}/{}s/{}?swagger&download{}", base_url, target.prefix, id, from_query);
    let header = if target.factory_only {
        "<p>Factory API to deploy contract instances</p>\n        <p>Set the constructor parameters in the <code>[POST]</code> panel, \
         and set <code>register</code> to give the new instance a friendly API path.</p>"
    } else {
        "<p>Contract gateway API exerciser</p>"
    };
    let factory_help = if target.is_factory { FACTORY_HELP } else { "" };
    let methods_help = if target.factory_only { "" } else { METHODS_HELP };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <script src="https://unpkg.com/rapidoc@7.1.0/dist/rapidoc-min.js"></script>
</head>
<body>
  <rapi-doc
    spec-url="{spec_url}"
    allow-authentication="false"
    allow-spec-url-load="false"
    allow-spec-file-load="false"
    heading-text="Contract Gateway"
    theme="light"
  >
    <div style="padding: 25px; display: flex; flex-direction: row; flex-wrap: wrap;">
      <div style="flex: 1;">
        {header}
        <ul>
          {factory_help}
          {methods_help}
          <li>Descriptions are taken from the devdoc of the contract source</li>
        </ul>
      </div>
      <div style="margin-left: auto;">
        <button type="button" onclick="window.open('{download_url}')">Download API</button>
      </div>
    </div>
  </rapi-doc>
</body>
</html>
"#,
        spec_url = spec_url,
        header = header,
        factory_help = factory_help,
        methods_help = methods_help,
        download_url = download_url,
    )
}
