#![no_main]

use critpath_analysis::{AnalysisOptions, analyze};
use critpath_core::metrics::NoopMetrics;
use critpath_core::parse::parse_graph_str;
use libfuzzer_sys::fuzz_target;

// Arbitrary text must either fail to parse, fail with a typed error, or
// produce a report; never panic. The parser caps `n`, and graphs above a few
// thousand nodes skip analysis to keep iterations fast.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = parse_graph_str(text) else {
        return;
    };
    if graph.node_count() > 4096 {
        return;
    }
    let _ = analyze(&graph, &AnalysisOptions::default(), &NoopMetrics);
});
