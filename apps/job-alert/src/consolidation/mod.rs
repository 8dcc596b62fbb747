// Result consolidation core: extraction, dedup, relevance scoring, ranking.
// No network access here — raw hits arrive through `search::SearchSource`.

pub mod dedup;
pub mod extract;
pub mod pipeline;
pub mod scoring;
