//! End-to-end runs of the HTTP session against a mock page server.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use statbunker_tap::app::{AppContext, TapError};
use statbunker_tap::config::{Backend, TapConfig};
use statbunker_tap::fetcher::HttpSession;
use statbunker_tap::sink::{SingerSink, StoreSink};
use statbunker_tap::store::{SqliteStore, Store};
use statbunker_tap::streams::StreamKind;

const RESULTS_PATH: &str = "/competitions/LastMatches";
const REPORT_PATH: &str = "/competitions/MatchDetails/Premier-League-21/22";

const SEASONS_PAGE: &str = r#"
<form id="comp">
<select name="comp_id">
<option value="-1">Select competition</option>
<option value="689">Premier League 21/22</option>
<option value="600">Premier League 99/00</option>
</select>
</form>
"#;

const RESULTS_PAGE_1: &str = r#"
<div class="upcomingMatchesCon">
<div class="upcomingMatchesTitle"><h1>Latest results</h1></div>
<div class="upcomingMatchesTitle"><h2>Premier League 21/22</h2></div>
<div class="upcomingMatchesTitle slateGrey"><h3>Wednesday 16 March 2022</h3></div>
<ul class="matchLineup">
<li>
<span class="matchDropdown"></span>
<span class="matchTeam">
<a></a>
<a href="/competitions/LastMatches?comp_id=689&club_id=5"></a>
<p>Arsenal</p>
</span>
<span class="matchVs">
<a href="https://www.statbunker.com/competitions/MatchDetails/Premier-League-21/22/Arsenal-VS-Liverpool?comp_id=689&match_id=115718&date=16-Mar-2022">
<p>0 - 2</p>
</a>
</span>
<span class="matchTeam">
<a></a>
<a href="/competitions/LastMatches?comp_id=689&club_id=4"></a>
<p>Liverpool</p>
</span>
<span class="matchTime"><p>20:15</p></span>
<span class="matchStatLink"></span>
</li>
</ul>
<div class="pagination">
<ul>
<li class="pagArrow"><a href="/1"><p>&#155;</p></a></li>
<li class="pagArrow"><a><p>&#155;&#155;</p></a></li>
</ul>
</div>
</div>
"#;

const RESULTS_PAGE_2: &str = r#"
<div class="upcomingMatchesCon">
<div class="upcomingMatchesTitle"><h1>Latest results</h1></div>
<div class="upcomingMatchesTitle"><h2>Premier League 21/22</h2></div>
<div class="upcomingMatchesTitle slateGrey"><h3>Monday 14 March 2022</h3></div>
<ul class="matchLineup">
<li>
<span class="matchDropdown"></span>
<span class="matchTeam">
<a></a>
<a href="/competitions/LastMatches?comp_id=689&club_id=749"></a>
<p>Brighton & Hove Albion</p>
</span>
<span class="matchVs">
<a href="https://www.statbunker.com/competitions/MatchDetails/Premier-League-21/22/Brighton---Hove-Albion-VS-Tottenham-Hotspur?comp_id=689&match_id=115717&date=16-Mar-2022">
<p>0 - 2</p>
</a>
</span>
<span class="matchTeam">
<a></a>
<a href="/competitions/LastMatches?comp_id=689&club_id=19"></a>
<p>Tottenham Hotspur</p>
</span>
<span class="matchTime"><p>19:30</p></span>
<span class="matchStatLink"></span>
</li>
</ul>
<div class="pagination"></div>
</div>
"#;

const REPORT_PAGE: &str = r#"
<div id="matchReportCon">
<ul class="matchReportInt"></ul>
<div class="matchReportTitle">
<div class="titleIntLeft"><h2>Wolverhampton Wanderers</h2></div>
<div class="titleIntCenter"><h2>2-3</h2></div>
<div class="titleIntRight"><h2>Leeds United</h2></div>
</div>
<div id="matchStats"></div>
<div class="matchReportInt">
<div class="matchReportSubInt">
<p>26` Jonny => Francisco Trincao</p>
<small>Right Foot, Left, Open Play, 18 yrds </small>
</div>
</div>
<div class="matchReportInt">
<div class="matchReportSubInt">
<p>63` Jack Harrison</p>
<small>Right Foot, Centre, Open Play, 18 yrds </small>
</div>
</div>
<ul class="matchReportInt"></ul>
<ul class="matchReportInt"></ul>
</div>
"#;

/// Serve `body` for GET `route` when every `query` pair is present; expects `hits` requests.
async fn mount_page(
    server: &MockServer,
    route: &str,
    query: &[(&str, &str)],
    body: &str,
    hits: u64,
) {
    let mut mock = Mock::given(method("GET")).and(path(route));
    for (key, value) in query {
        mock = mock.and(query_param(*key, *value));
    }
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

fn config(server: &MockServer, stream: StreamKind) -> TapConfig {
    let mut config = TapConfig {
        stream: Some(stream.name().to_string()),
        comp_id: Some(689),
        match_id: Some(115720),
        comp_name: Some("Premier League 21/22".into()),
        ..Default::default()
    };
    config.browser.base_url = format!("{}/", server.uri());
    config.browser.backend = Backend::Http;
    config.retry.backoff_ms = 0;
    config
}

async fn run_singer(config: TapConfig) -> Result<Vec<Value>, TapError> {
    let ctx = AppContext::new(config);
    let mut session = HttpSession::new(ctx.config.browser.clone())?;
    let mut sink = SingerSink::new(Vec::new());

    ctx.run(&mut session, &mut sink).await?;

    let out = String::from_utf8(sink.into_inner()).unwrap();
    Ok(out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

fn records(messages: &[Value]) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| m["type"] == "RECORD")
        .map(|m| m["record"].clone())
        .collect()
}

#[tokio::test]
async fn test_seasons_stream() {
    let server = MockServer::start().await;
    mount_page(&server, RESULTS_PATH, &[("comp_id", "689")], SEASONS_PAGE, 1).await;

    let messages = run_singer(config(&server, StreamKind::Seasons)).await.unwrap();

    assert_eq!(messages.first().unwrap()["type"], "SCHEMA");
    assert_eq!(messages.last().unwrap(), &json!({"type": "STATE", "value": {}}));
    assert_eq!(
        records(&messages),
        vec![
            json!({"id": 689, "name": "Premier League 21/22", "years": {"start": 2021, "end": 2022}}),
            json!({"id": 600, "name": "Premier League 99/00", "years": {"start": 1999, "end": 2000}}),
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_matches_for_club_follow_pagination() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        RESULTS_PATH,
        &[("comp_id", "689"), ("club_id", "5")],
        RESULTS_PAGE_1,
        1,
    )
    .await;
    mount_page(&server, "/1", &[], RESULTS_PAGE_2, 1).await;

    let mut config = config(&server, StreamKind::Matches);
    config.club_id = Some(5);
    let messages = run_singer(config).await.unwrap();

    assert_eq!(
        records(&messages),
        vec![
            json!({
                "id": 115718,
                "comp_id": 689,
                "teams": {
                    "home": {"id": 5, "name": "Arsenal"},
                    "away": {"id": 4, "name": "Liverpool"}
                },
                "scores": {"home": 0, "away": 2},
                "timestamp": "2022-03-16T20:15:00"
            }),
            json!({
                "id": 115717,
                "comp_id": 689,
                "teams": {
                    "home": {"id": 749, "name": "Brighton & Hove Albion"},
                    "away": {"id": 19, "name": "Tottenham Hotspur"}
                },
                "scores": {"home": 0, "away": 2},
                "timestamp": "2022-03-14T19:30:00"
            }),
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_resolved_parameters_must_reach_the_site() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        RESULTS_PATH,
        &[("comp_id", "689"), ("club_id", "5")],
        RESULTS_PAGE_2,
        0,
    )
    .await;

    // no club_id configured, so the club-scoped page is never served
    let err = run_singer(config(&server, StreamKind::Matches))
        .await
        .unwrap_err();

    assert!(matches!(err, TapError::Session(_)));
    server.verify().await;
}

#[tokio::test]
async fn test_match_details_stream() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        REPORT_PATH,
        &[("comp_id", "689"), ("match_id", "115720")],
        REPORT_PAGE,
        1,
    )
    .await;

    let messages = run_singer(config(&server, StreamKind::MatchDetails)).await.unwrap();

    assert_eq!(messages[0]["key_properties"], json!(["id"]));
    assert_eq!(
        records(&messages),
        vec![json!({
            "id": 115720,
            "comp_id": 689,
            "teams": {"home": "Wolverhampton Wanderers", "away": "Leeds United"},
            "goals": {
                "home": [{
                    "minute": 26,
                    "scorer": "Francisco Trincao",
                    "assister": "Jonny",
                    "foot": "Right Foot",
                    "shot_direction": "left",
                    "type": "Open Play",
                    "distance": 18
                }],
                "away": [{
                    "minute": 63,
                    "scorer": "Jack Harrison",
                    "assister": null,
                    "foot": "Right Foot",
                    "shot_direction": "centre",
                    "type": "Open Play",
                    "distance": 18
                }]
            }
        })]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_unready_page_is_reloaded_then_fails() {
    let server = MockServer::start().await;
    mount_page(&server, RESULTS_PATH, &[("comp_id", "689")], "<div></div>", 2).await;
    let mut config = config(&server, StreamKind::Seasons);
    config.retry.max_attempts = 2;

    let err = run_singer(config).await.unwrap_err();

    assert!(matches!(err, TapError::FatalStructure(_)));
    assert_eq!(err.to_string(), "Cannot find season form in page source");
    server.verify().await;
}

#[tokio::test]
async fn test_missing_comp_id_fails_without_requests() {
    let server = MockServer::start().await;
    let mut config = config(&server, StreamKind::Seasons);
    config.comp_id = None;

    let err = run_singer(config).await.unwrap_err();

    assert_eq!(err.to_string(), "comp_id is required");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_records_into_store() {
    let server = MockServer::start().await;
    mount_page(&server, RESULTS_PATH, &[("comp_id", "689")], RESULTS_PAGE_1, 1).await;
    mount_page(&server, "/1", &[], RESULTS_PAGE_2, 1).await;

    let ctx = AppContext::new(config(&server, StreamKind::Matches));
    let mut session = HttpSession::new(ctx.config.browser.clone()).unwrap();
    let store = SqliteStore::in_memory().unwrap();
    let mut sink = StoreSink::new(&store);

    let summary = ctx.run(&mut session, &mut sink).await.unwrap();

    assert_eq!(summary.streams[0].pages, 2);
    assert_eq!(store.records(StreamKind::Matches).unwrap().len(), 2);
    let stored = store
        .get_record(StreamKind::Matches, "115717")
        .unwrap()
        .unwrap();
    assert_eq!(stored.payload["teams"]["home"]["name"], "Brighton & Hove Albion");
}
