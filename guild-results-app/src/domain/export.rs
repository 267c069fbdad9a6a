use crate::domain::result::GameResult;

/// Renders one `name,score,enemyScore,enemy,date` line per record.
///
/// There is no header row and fields are written verbatim, so a comma inside
/// a guild name or date shifts the columns of that line.
pub fn results_to_csv(name: &str, results: &[GameResult]) -> Vec<u8> {
    let mut out = String::with_capacity(results.len() * 48);
    for result in results {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            name, result.score, result.enemy_score, result.enemy, result.date
        ));
    }
    out.into_bytes()
}
