use super::Dataset;
use crate::params::ParamRef;
use crate::process::{Attach, FieldSpec};
use crate::resolve::Selection;

/// Providers benchmarked in the recorded runs.
pub const PROVIDERS: &[&str] = &["alchemy", "chainstack", "quicknode"];

/// Datasets assembled from the recorded benchmark runs.
pub fn builtin() -> Vec<Dataset> {
    vec![
        // h2 flood, 3 clients, 100 in flight
        Dataset {
            name: "protocols".into(),
            selection: Selection::providers(PROVIDERS, ",b=1000,c=100,p=h2,i=3.csv"),
            attach: Attach::Projection(vec![
                FieldSpec::new("provider", ParamRef::Position(0)),
                FieldSpec::new("proto", ParamRef::key("p")),
                FieldSpec::new("cn", ParamRef::key("i")),
            ]),
        },
        // rate limit probe, 14 clients, 1000 in flight
        Dataset {
            name: "limits".into(),
            selection: Selection::providers(PROVIDERS, ",limits,b=1000,c=1000,p=h2,i=14.csv"),
            attach: Attach::Projection(vec![FieldSpec::new("provider", ParamRef::Position(0))]),
        },
        Dataset {
            name: "burst".into(),
            selection: Selection::Glob("*,burst,*.csv".into()),
            attach: Attach::default_projection(),
        },
        Dataset {
            name: "chainstack-concurrency".into(),
            selection: Selection::Explicit(
                (98..=102)
                    .map(|n| format!("chainstack,concurrency,limits,b={n},c={n}.csv"))
                    .collect(),
            ),
            attach: Attach::Projection(vec![FieldSpec::new("concurrency", ParamRef::key("c"))]),
        },
    ]
}
