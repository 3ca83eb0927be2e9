/// Mock fixture data for testing and development
///
/// This module provides a small, deterministic static site that can be used for:
/// 1. Unit and integration tests - ensuring tests have predictable data
/// 2. Development mock mode - running the app without a generated site on disk
/// 3. Benchmarks - providing consistent data for performance testing
///
/// The fixtures describe two divisions, three teams and a handful of players
/// with matchup fragments for 2024 and 2023.
use serde_json::{json, Value};

use crate::matchups::{FragmentIndex, MatchupLists, INDEX_PATH, LISTS_PATH};
use crate::navigation::{NavManifest, NAV_PATH};
use crate::years::{YearPageLookup, LOOKUP_PATH};

fn index_json() -> Value {
    json!({
        "modes": {
            "sp_vs_team": { "fragments": {
                "2024": {
                    "Jane Doe": {
                        "vs.": { "RedHawks": "frag_001.html" },
                        "@": { "Mariners": "frags/sp_002.html" }
                    },
                    "Carl Ortiz": { "@": { "RedHawks": "frags/sp_003.html" } }
                },
                "2023": {
                    "Jane Doe": { "vs.": { "BlueSox": "frags/2023_001.html" } },
                    "Carl Ortiz": { "@": { "Mariners": "frags/2023_002.html" } }
                }
            }},
            "sp_vs_2": { "fragments": {
                "2024": {
                    "Jane Doe": { "vs.": { "RedHawks": "frags/sp2_001.html" } },
                    "Carl Ortiz": { "@": { "RedHawks": "frags/sp2_003.html" } }
                }
            }},
            "hitter_vs_pitcher": { "fragments": {
                "2024": {
                    "Al Smith": { "vs.": { "Jane Doe": "frags/hvp_001.html" } },
                    "Cy Young": { "@": { "Carl Ortiz": "frags/hvp_002.html" } }
                }
            }},
            "multi_hitter": { "fragments": {
                "2024": {
                    "Al Smith": { "vs.": { "Jane Doe": "frags/mh_001.html" } },
                    "Cy Young": { "@": { "Carl Ortiz": "frags/mh_002.html" } }
                }
            }},
            "rp_inning": { "fragments": {
                "2024": {
                    "Rob Reyes": { "Al Smith": { "Bob Zant": { "Cy Young": "frags/rp_001.html" } } }
                }
            }}
        }
    })
}

fn lists_json() -> Value {
    json!({
        "years": ["2024", "2023"],
        "by_year": {
            "2024": {
                "hitters": ["Dee Park", "Al Smith", "Cy Young", "Bob Zant"],
                "pitchers": ["Jane Doe", "Carl Ortiz", "Rob Reyes"],
                "teams": ["Mariners", "RedHawks"],
                "hitters_by_team": [
                    { "label": "Mariners", "options": ["Dee Park"] },
                    { "label": "RedHawks", "options": ["Al Smith", "Cy Young", "Bob Zant"] }
                ],
                "pitchers_by_team": [
                    { "label": "Mariners", "options": ["Carl Ortiz"] },
                    { "label": "RedHawks", "options": ["Jane Doe", "Rob Reyes"] }
                ]
            }
        }
    })
}

fn nav_json() -> Value {
    json!({
        "pages": [
            { "id": "home", "file": "pages/home.html", "title": "Home" },
            { "id": "key", "file": "pages/key.html", "title": "Key" },
            { "id": "matchups", "file": "pages/matchups.html", "title": "Matchups" }
        ],
        "divisions": [
            { "id": "al_west", "name": "AL West", "teams": [
                { "id": "RedHawks", "name": "RedHawks", "roles": [
                    { "role": "batters", "items": [
                        { "label": "Catchers" },
                        { "page": "p_al_smith", "file": "pages/al_smith.html", "name": "Al Smith",
                          "person_key": "al_smith", "is_minors": true },
                        { "label": "Infielders" },
                        { "page": "p_bob_zant", "file": "pages/bob_zant.html", "name": "Bob Zant",
                          "person_key": "bob_zant" },
                        { "page": "p_cy_young", "file": "pages/cy_young.html", "name": "Cy Young",
                          "is_hurt": true }
                    ]},
                    { "role": "pitchers", "items": [
                        { "page": "p_jane_doe", "file": "pages/jane_doe.html", "name": "Jane Doe",
                          "person_key": "jane_doe" },
                        { "page": "p_rob_reyes", "file": "pages/rob_reyes.html", "name": "Rob Reyes",
                          "is_susp": true }
                    ]}
                ]},
                { "id": "Mariners", "name": "Mariners", "roles": [
                    { "role": "batters", "items": [
                        { "page": "p_dee_park", "file": "pages/dee_park.html", "name": "Dee Park" },
                        { "page": "p_gus_hale", "name": "Gus Hale" }
                    ]},
                    { "role": "pitchers", "items": [
                        { "page": "p_carl_ortiz", "file": "pages/carl_ortiz.html", "name": "Carl Ortiz" }
                    ]}
                ]}
            ]},
            { "id": "nl_east", "name": "NL East", "teams": [
                { "id": "BlueSox", "name": "BlueSox", "roles": [
                    { "role": "batters", "items": [
                        { "page": "p_eve_stone", "file": "pages/eve_stone.html", "name": "Eve Stone",
                          "is_minors": true }
                    ]},
                    { "role": "pitchers", "items": [
                        { "page": "p_finn_lowe", "file": "pages/finn_lowe.html", "name": "Finn Lowe" }
                    ]}
                ]}
            ]}
        ]
    })
}

fn lookup_json() -> Value {
    json!({
        "2024": {
            "batters": { "al_smith": "pages/al_smith_2024.html" },
            "pitchers": { "jane_doe": "pages/jane_doe.html" }
        },
        "2023": { "pitchers": { "jane_doe": "pages/jane_doe_2023.html" } },
        "2022": { "pitchers": { "jane_doe": "pages/jane_doe_2022.html" } }
    })
}

/// Create the mock fragment index
pub fn create_mock_index() -> FragmentIndex {
    serde_json::from_value(index_json()).expect("fixture index is valid")
}

/// Create the mock precomputed dropdown pack (2024 only; 2023 must be derived)
pub fn create_mock_lists() -> MatchupLists {
    serde_json::from_value(lists_json()).expect("fixture lists are valid")
}

pub fn create_mock_nav() -> NavManifest {
    serde_json::from_value(nav_json()).expect("fixture manifest is valid")
}

pub fn create_mock_lookup() -> YearPageLookup {
    serde_json::from_value(lookup_json()).expect("fixture lookup is valid")
}

fn player_page(name: &str, line: &str) -> String {
    format!(
        r#"<div class="player_page"><h2>{name}</h2><p>{line}</p><div id="plot_{id}"></div><script type="text/javascript">Plotly.newPlot("plot_{id}", []);</script></div>"#,
        name = name,
        line = line,
        id = name.to_lowercase().replace(' ', "_"),
    )
}

fn matchup_fragment(title: &str) -> String {
    format!(r#"<div class="matchup"><h3>{}</h3><table><tr><td>PA</td><td>12</td></tr></table></div>"#, title)
}

/// Every file of the mock site, keyed by site-relative path
pub fn mock_site_files() -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = vec![
        (INDEX_PATH.to_string(), index_json().to_string()),
        (LISTS_PATH.to_string(), lists_json().to_string()),
        (NAV_PATH.to_string(), nav_json().to_string()),
        (LOOKUP_PATH.to_string(), lookup_json().to_string()),
        (
            "pages/home.html".to_string(),
            "<h1>MLB Dashboard</h1><p>Pick a player from the sidebar.</p>".to_string(),
        ),
        (
            "pages/key.html".to_string(),
            "<h1>Key</h1><ul><li>K% strikeout rate</li><li>BB% walk rate</li></ul>".to_string(),
        ),
        (
            "pages/matchups.html".to_string(),
            r#"<h1>Matchups</h1><div id="matchups_tool"></div><script src="assets/matchups.js"></script>"#
                .to_string(),
        ),
        (
            "frag_001.html".to_string(),
            r#"<div class="matchup"><h3>Jane Doe vs. RedHawks</h3><div id="mx_001"></div><script type="text/javascript">Plotly.newPlot("mx_001", []);</script></div>"#
                .to_string(),
        ),
    ];

    let players = [
        ("pages/al_smith.html", "Al Smith", "AVG .281 OPS .802"),
        ("pages/al_smith_2024.html", "Al Smith 2024", "AVG .265 OPS .771"),
        ("pages/bob_zant.html", "Bob Zant", "AVG .244 OPS .690"),
        ("pages/cy_young.html", "Cy Young", "AVG .301 OPS .880"),
        ("pages/dee_park.html", "Dee Park", "AVG .259 OPS .733"),
        ("pages/eve_stone.html", "Eve Stone", "AVG .233 OPS .650"),
        ("pages/jane_doe.html", "Jane Doe", "ERA 2.91 WHIP 1.02"),
        ("pages/jane_doe_2023.html", "Jane Doe 2023", "ERA 3.40 WHIP 1.15"),
        ("pages/jane_doe_2022.html", "Jane Doe 2022", "ERA 4.05 WHIP 1.31"),
        ("pages/rob_reyes.html", "Rob Reyes", "ERA 3.12 SV 21"),
        ("pages/carl_ortiz.html", "Carl Ortiz", "ERA 3.77 WHIP 1.20"),
        ("pages/finn_lowe.html", "Finn Lowe", "ERA 4.44 WHIP 1.38"),
    ];
    files.extend(
        players
            .iter()
            .map(|(path, name, line)| (path.to_string(), player_page(name, line))),
    );

    let matchups = [
        ("frags/sp_002.html", "Jane Doe @ Mariners"),
        ("frags/sp_003.html", "Carl Ortiz @ RedHawks"),
        ("frags/2023_001.html", "Jane Doe vs. BlueSox (2023)"),
        ("frags/2023_002.html", "Carl Ortiz @ Mariners (2023)"),
        ("frags/sp2_001.html", "Jane Doe vs. RedHawks"),
        ("frags/sp2_003.html", "Carl Ortiz @ RedHawks"),
        ("frags/hvp_001.html", "Al Smith vs. Jane Doe"),
        ("frags/hvp_002.html", "Cy Young @ Carl Ortiz"),
        ("frags/mh_001.html", "Al Smith vs. Jane Doe"),
        ("frags/mh_002.html", "Cy Young @ Carl Ortiz"),
        ("frags/rp_001.html", "Rob Reyes vs. Smith, Zant, Young"),
    ];
    files.extend(
        matchups
            .iter()
            .map(|(path, title)| (path.to_string(), matchup_fragment(title))),
    );

    files
}
