//! Integration tests: provider and resort strategies against a mock server.

use liftstat_core::{Counts, ResortDescriptor, StatsProvider};
use liftstat_fetch::{FetchContext, FetchSettings, StatsStrategy, Tier};
use liftstat_providers::{
    AbasinStrategy, AlyeskaStrategy, BoyneReportStrategy, CamelbackStrategy, GenericFeedStrategy,
    JacksonHoleStrategy, PowdrStrategy, ReportPalAreasStrategy, ReportPalStrategy, SierraStrategy,
    SnowmassStrategy, StatsRegistry,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ctx() -> FetchContext {
    FetchContext::with_settings(FetchSettings::default().with_max_retries(0))
}

fn resort_at(id: &str, server: &MockServer, route: &str) -> ResortDescriptor {
    ResortDescriptor::new(id).with_stats_url(format!("{}{route}", server.uri()).parse().unwrap())
}

async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

// ============================================================================
// reportpal
// ============================================================================

#[tokio::test]
async fn test_reportpal_summary_from_stats_url() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/api/reportpal",
        200,
        r#"{"currentConditions": {
            "resortwide": {"numTrailsOpen": "41", "numTrailsTotal": 65, "numLiftsOpen": 7,
                           "numLiftsTotal": 9, "numTrailsGroomed": 22},
            "resortLocations": {"location": {"name": "Base", "base": {"inches": "30 - 45"}}}
        }}"#,
    )
    .await;

    let record = ReportPalStrategy::new()
        .extract(&resort_at("crystal", &server, "/api/reportpal"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.trails, Counts::new(41, 65));
    assert_eq!(record.lifts, Counts::new(7, 9));
    assert_eq!(record.groomed, 22);
    assert_eq!(record.base_depth, 30);
}

#[tokio::test]
async fn test_reportpal_areas_filters_carpets_and_connectors() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/areas",
        200,
        r#"{
            "currentConditions": {"resortLocations": {"location": [
                {"name": "Alpental", "base": {"inches": 0}},
                {"name": "Summit West", "base": {"inches": "52"}}
            ]}},
            "facilities": {"areas": {"area": [
                {"name": "Summit West",
                 "lifts": {"lift": [
                    {"name": "Pacific Crest", "type": "Quad", "status": "Open"},
                    {"name": "Easy Gold", "type": "Double", "status": "Closed"},
                    {"name": "Carpet 1", "type": "Magic Carpet", "status": "Open"}
                 ]},
                 "trails": {"trail": [
                    {"name": "Holiday", "status": "Open", "groomed": true},
                    {"name": "West to Central Upper", "status": "Open", "groomed": true},
                    {"name": "Dodge Ridge", "status": "Closed"}
                 ]}},
                {"name": "Nordic", "trails": {"trail": [{"name": "Loop", "status": "Open"}]}},
                {"name": "Alpental",
                 "lifts": {"lift": {"name": "Chair 2", "type": "Double", "status": "Open"}},
                 "trails": {"trail": [
                    {"name": "Summit East to Alpental", "status": "Closed"},
                    {"name": "Upper International", "status": "Open", "groomed": "false"}
                 ]}}
            ]}}
        }"#,
    )
    .await;

    let record = ReportPalAreasStrategy::snoqualmie()
        .extract(&resort_at("summit-at-snoqualmie", &server, "/areas"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(2, 3));
    assert_eq!(record.trails, Counts::new(2, 3));
    assert_eq!(record.groomed, 1);
    assert_eq!(record.base_depth, 52);
}

// ============================================================================
// POWDR
// ============================================================================

#[tokio::test]
async fn test_powdr_survives_one_failed_list() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/api/v1/dor/drupal/trails",
        200,
        r#"[
            {"name": "Chip's Run", "season": "winter", "type": "alpine_trail", "status": "open", "groom_status": "groomed_am"},
            {"name": "Regulator", "season": "winter", "type": "alpine_trail", "status": "closed"},
            {"name": "Bike Trail", "season": "summer", "type": "alpine_trail", "status": "open"}
        ]"#,
    )
    .await;
    serve(
        &server,
        "/api/v1/dor/drupal/snow-reports",
        200,
        r#"[{"location": {"name": "Upper"}, "base_depth": 90},
            {"location": {"name": "Primary"}, "base_depth": "82"}]"#,
    )
    .await;
    serve(&server, "/api/v1/dor/drupal/lifts", 500, "").await;

    let resort = ResortDescriptor::new("snowbird")
        .with_api(format!("{}/", server.uri()).parse().unwrap());
    let record = PowdrStrategy::new().extract(&resort, &ctx()).await.unwrap();

    assert_eq!(record.trails, Counts::new(1, 2));
    assert_eq!(record.groomed, 1);
    assert_eq!(record.lifts, Counts::default());
    assert_eq!(record.base_depth, 82);
}

#[tokio::test]
async fn test_powdr_all_lists_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let resort = ResortDescriptor::new("snowbird")
        .with_api(format!("{}/", server.uri()).parse().unwrap());
    assert!(PowdrStrategy::new().extract(&resort, &ctx()).await.is_none());
}

// ============================================================================
// Boyne and generic
// ============================================================================

#[tokio::test]
async fn test_boyne_printable_report() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/bh/printablereports",
        200,
        r#"<table><tr>
            <td id="openTrails">55<br/><div id="trails_caption">TRAILS OF 61</div></td>
            <td id="openLifts">8<br/><div id="lifts_caption">LIFTS OF 10</div></td>
            <td id="base"><span id="base_total"><text>44''</text></span></td>
        </tr></table>"#,
    )
    .await;

    let record = BoyneReportStrategy::new()
        .extract(&resort_at("boyne-highlands", &server, "/bh/printablereports"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.trails, Counts::new(55, 61));
    assert_eq!(record.lifts, Counts::new(8, 10));
    assert_eq!(record.base_depth, 44);
}

#[tokio::test]
async fn test_generic_detects_mtnpowder_payload() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/stats.json",
        200,
        r#"{"Resorts": {"ID": 9, "SnowReport": {"TotalOpenLifts": 3, "TotalLifts": 6,
            "TotalOpenTrails": 12, "TotalTrails": 40, "SnowBaseRangeIn": "20 - 30"}}}"#,
    )
    .await;

    let record = GenericFeedStrategy::new()
        .extract(&resort_at("small-hill", &server, "/stats.json"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(3, 6));
    assert_eq!(record.trails, Counts::new(12, 40));
    assert_eq!(record.base_depth, 20);
}

#[tokio::test]
async fn test_generic_rejects_html() {
    let server = MockServer::start().await;
    serve(&server, "/", 200, "<html><body>Closed for the season</body></html>").await;

    let resort =
        ResortDescriptor::new("small-hill").with_url(server.uri().parse().unwrap());
    assert!(GenericFeedStrategy::new().extract(&resort, &ctx()).await.is_none());
}

// ============================================================================
// Resort extractors
// ============================================================================

#[tokio::test]
async fn test_abasin_page() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/snow-report/",
        200,
        r#"<div class="stat"><h5>104<span>/147</span></h5>
            <p>Open Runs</p></div>
           <div class="stat"><h5>7<span>/9</span></h5>
            <p>Open Lifts</p></div>
           <div>38" <span>Base</span></div>
           <i class="grooming-icon"></i><i class="grooming-icon"></i>"#,
    )
    .await;

    let record = AbasinStrategy::with_url(format!("{}/snow-report/", server.uri()))
        .extract(&ResortDescriptor::new("abasin"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.trails, Counts::new(104, 147));
    assert_eq!(record.lifts, Counts::new(7, 9));
    assert_eq!(record.groomed, 2);
    assert_eq!(record.base_depth, 38);
}

#[tokio::test]
async fn test_camelback_fixed_totals() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/conditions/snow-report/",
        200,
        r#"<dl><dt>Open Lifts</dt><dd>5 Lifts</dd></dl>
           <dl><dt>Open Trails</dt><dd>22 Trails</dd></dl>
           <dl><dt>Grooming</dt><dd>14 Trails</dd></dl>
           <dl><dt>Base Depth</dt><dd>20 - 48 in.</dd></dl>"#,
    )
    .await;

    let record = CamelbackStrategy::with_url(format!("{}/conditions/snow-report/", server.uri()))
        .extract(&ResortDescriptor::new("camelback"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(5, 9));
    assert_eq!(record.trails, Counts::new(22, 39));
    assert_eq!(record.groomed, 14);
    assert_eq!(record.base_depth, 20);
}

#[tokio::test]
async fn test_alyeska_lift_markers() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/mountain-report-winter",
        200,
        r#"<span class="divider">40 / 76</span><p>Trails Open</p>
           <li>Aerial Tram ● OPEN</li><li>Chair 7 ● HOLD</li>"#,
    )
    .await;

    let record = AlyeskaStrategy::with_url(format!("{}/mountain-report-winter", server.uri()))
        .extract(&ResortDescriptor::new("alyeska"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(1, 2));
    assert_eq!(record.trails, Counts::new(40, 76));
}

#[tokio::test]
async fn test_sierra_page_without_status_is_unavailable() {
    let server = MockServer::start().await;
    serve(&server, "/weather-snow-report/", 200, "<html>Maintenance</html>").await;

    let result = SierraStrategy::with_url(format!("{}/weather-snow-report/", server.uri()))
        .extract(&ResortDescriptor::new("sierra"), &ctx())
        .await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_jackson_hole_api() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/api/all.json",
        200,
        r#"{"trailStatus": {"openTrails": 120, "totalTrails": 131, "groomedTrails": 40},
            "liftStatus": {"openLifts": 12, "totalLifts": 14},
            "snow": {"midMountain": {"totalSnowDepth": {"value": 71}}}}"#,
    )
    .await;

    let strategy = JacksonHoleStrategy::with_url(format!("{}/api/all.json", server.uri()));
    let record = strategy
        .extract(&ResortDescriptor::new("jackson-hole"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(12, 14));
    assert_eq!(record.base_depth, 71);
}

#[tokio::test]
async fn test_jackson_hole_server_error() {
    let server = MockServer::start().await;
    serve(&server, "/api/all.json", 502, "").await;

    let strategy = JacksonHoleStrategy::with_url(format!("{}/api/all.json", server.uri()));
    assert!(
        strategy
            .extract(&ResortDescriptor::new("jackson-hole"), &ctx())
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_snowmass_sums_answering_mountains() {
    let server = MockServer::start().await;
    let feed = |mountain: &str, body: &str| {
        Mock::given(method("GET"))
            .and(path("/feed"))
            .and(query_param("mountain", mountain))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
    };
    feed(
        "Snowmass",
        r#"{"lifts": {"openCount": 15, "totalCount": 21}, "trails": {"open": 80, "total": 98}, "snowBase": {"inches": 44}}"#,
    )
    .mount(&server)
    .await;
    feed(
        "AspenMountain",
        r#"{"lifts": {"open": 6, "total": 8}, "trails": {"open": 60, "total": 76}, "snowBase": {"inches": "51"}}"#,
    )
    .mount(&server)
    .await;
    feed(
        "Buttermilk",
        r#"{"lifts": {"open": 0, "total": 10}, "trails": {"open": 0, "total": 44}, "snowBase": {"inches": 30}}"#,
    )
    .mount(&server)
    .await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(query_param("mountain", "AspenHighlands"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let strategy = SnowmassStrategy::with_feed_url(format!("{}/feed?mountain=", server.uri()));
    let record = strategy
        .extract(&ResortDescriptor::new("snowmass"), &ctx())
        .await
        .unwrap();
    assert_eq!(record.lifts, Counts::new(21, 39));
    assert_eq!(record.trails, Counts::new(140, 218));
    assert_eq!(record.groomed, 0);
    assert_eq!(record.base_depth, 51);
}

// ============================================================================
// Registry dispatcher
// ============================================================================

#[tokio::test]
async fn test_declared_provider_resolves_resort_specific() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/printable",
        200,
        r#"<td id="openLifts">6<br/><div id="lifts_caption">LIFTS OF 9</div></td>"#,
    )
    .await;

    let resort = resort_at("boyne-mountain", &server, "/printable")
        .with_stats_provider(StatsProvider::Boyne);
    let dispatcher = StatsRegistry::dispatcher(std::slice::from_ref(&resort));

    let resolution = dispatcher.resolve(&resort, &ctx()).await;
    assert!(resolution.is_available());
    assert_eq!(resolution.winning_strategy(), Some("boyne.printable"));
    assert_eq!(resolution.attempts.len(), 1);
    assert_eq!(resolution.record().unwrap().lifts, Counts::new(6, 9));
}

#[tokio::test]
async fn test_unknown_resort_uses_generic_fallback() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/conditions.json",
        200,
        r#"{"lifts": {"open": 4, "total": 9}, "trails": {"open": 30, "total": 70}, "groomed": 12, "baseDepth": 41}"#,
    )
    .await;

    let resort = resort_at("local-hill", &server, "/conditions.json");
    let dispatcher = StatsRegistry::dispatcher(&[]);

    let resolution = dispatcher.resolve(&resort, &ctx()).await;
    let outcome = resolution.outcome.as_ref().unwrap();
    assert_eq!(outcome.tier, Tier::GenericFallback);
    assert_eq!(outcome.record.trails, Counts::new(30, 70));
    assert_eq!(outcome.record.base_depth, 41);
}

#[tokio::test]
async fn test_every_tier_failing_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/printable"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Maintenance</html>"))
        .expect(2)
        .mount(&server)
        .await;

    let resort = resort_at("boyne-mountain", &server, "/printable")
        .with_stats_provider(StatsProvider::Boyne);
    let dispatcher = StatsRegistry::dispatcher(std::slice::from_ref(&resort));

    let resolution = dispatcher.resolve(&resort, &ctx()).await;
    assert!(!resolution.is_available());
    assert_eq!(
        resolution
            .attempts
            .iter()
            .map(|a| (a.strategy_id.as_str(), a.tier, a.success))
            .collect::<Vec<_>>(),
        vec![
            ("boyne.printable", Tier::ResortSpecific, false),
            ("generic.feed", Tier::GenericFallback, false),
        ]
    );
}
