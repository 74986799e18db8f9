//! Operator-facing audit listings. Reporting only; never touches scores.

use crate::engine::exchange::similar;
use crate::record::ContactRecord;

/// Fuzzy-match threshold for "similar" callsigns.
const SIMILAR_THRESHOLD: f64 = 0.7;

/// Lines describing every contact with exactly this callsign, flagging
/// name/QTH drift between repeats.
pub fn list_all_qsos(call: &str, qsos: &[ContactRecord]) -> Vec<String> {
    let call = call.to_ascii_uppercase();
    let mut lines = vec![format!("All QSOs with {call}:")];

    let mut consistent = true;
    let mut prev: Option<(String, String)> = None;
    for rec in qsos.iter().filter(|r| r.call == call) {
        let name = rec.name.clone().unwrap_or_default().to_ascii_uppercase();
        let qth = rec
            .qth
            .clone()
            .or_else(|| rec.state.clone())
            .unwrap_or_default()
            .to_ascii_uppercase();
        lines.push(format!(
            "  call={}  name={name}  qth={qth}  band={}",
            rec.call, rec.band
        ));
        if let Some((pname, pqth)) = &prev {
            consistent = consistent && *pname == name && *pqth == qth;
        }
        prev = Some((name, qth));
    }

    if !consistent {
        lines.push("  *** NAME and/or QTH mismatch between contacts ***".to_string());
    }
    lines
}

/// Lines describing contacts whose callsign is close to, but not exactly,
/// the given call — likely busted copies.
pub fn list_similar_calls(call: &str, qsos: &[ContactRecord]) -> Vec<String> {
    let call = call.to_ascii_uppercase();
    let mut lines = vec![format!("QSOs with calls similar to {call}:")];

    for rec in qsos {
        let ratio = similar(&rec.call, &call);
        if ratio >= SIMILAR_THRESHOLD && ratio < 1.0 {
            let name = rec.name.clone().unwrap_or_default().to_ascii_uppercase();
            let qth = rec
                .qth
                .clone()
                .or_else(|| rec.state.clone())
                .unwrap_or_default()
                .to_ascii_uppercase();
            lines.push(format!(
                "  call={}  name={name}  qth={qth}  band={}  dist={ratio:.2}",
                rec.call, rec.band
            ));
        }
    }
    lines
}
