use crate::domain::value_objects::DocumentType;

/// Keyword evidence per candidate type. Text keywords count one point per
/// distinct match; a filename pattern match adds a single smaller bonus
/// point on top.
const KEYWORD_TABLE: [(DocumentType, &[&str], &[&str]); 5] = [
    (
        DocumentType::PolicyWording,
        &[
            "policy",
            "premium",
            "coverage",
            "insured",
            "insurer",
            "exclusion",
            "deductible",
            "sum insured",
            "waiting period",
            "claim",
            "benefit",
            "rider",
        ],
        &["policy", "insurance", "wording"],
    ),
    (
        DocumentType::Legal,
        &[
            "agreement",
            "party",
            "parties",
            "clause",
            "jurisdiction",
            "hereinafter",
            "indemnity",
            "arbitration",
            "termination",
            "warranty",
            "governing law",
            "breach",
        ],
        &["contract", "agreement", "legal"],
    ),
    (
        DocumentType::Financial,
        &[
            "invoice",
            "balance",
            "revenue",
            "expense",
            "fiscal",
            "audit",
            "dividend",
            "interest rate",
            "asset",
            "liability",
            "equity",
            "cash flow",
        ],
        &["invoice", "financial", "statement"],
    ),
    (
        DocumentType::Technical,
        &[
            "api",
            "server",
            "configuration",
            "deployment",
            "architecture",
            "database",
            "protocol",
            "endpoint",
            "latency",
            "throughput",
            "runtime",
            "schema",
        ],
        &["manual", "technical", "spec"],
    ),
    (
        DocumentType::Medical,
        &[
            "patient",
            "diagnosis",
            "treatment",
            "symptom",
            "prescription",
            "dosage",
            "clinical",
            "surgery",
            "hospital",
            "physician",
            "pathology",
            "discharge",
        ],
        &["medical", "clinical", "discharge"],
    ),
];

#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Minimum aggregate match count a type must reach to win. Below the
    /// floor the result degrades to `Unknown`.
    pub confidence_floor: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { confidence_floor: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub document_type: DocumentType,
    pub match_count: u32,
}

/// Content-and-filename document type classifier. Deterministic and
/// side-effect-free: identical inputs always produce identical output.
/// Never errors; unconfident input degrades to `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, text: &str, filename: &str) -> Classification {
        let text_lower = text.to_lowercase();
        let filename_lower = filename.to_lowercase();

        let mut best: Option<(DocumentType, u32)> = None;
        let mut tied = false;

        for (document_type, keywords, filename_patterns) in KEYWORD_TABLE {
            let keyword_matches = keywords
                .iter()
                .filter(|keyword| text_lower.contains(*keyword))
                .count() as u32;

            let filename_bonus = if filename_patterns
                .iter()
                .any(|pattern| filename_lower.contains(pattern))
            {
                1
            } else {
                0
            };

            let score = keyword_matches + filename_bonus;

            match best {
                Some((_, best_score)) if score > best_score => {
                    best = Some((document_type, score));
                    tied = false;
                }
                Some((_, best_score)) if score == best_score => {
                    tied = true;
                }
                None => {
                    best = Some((document_type, score));
                    tied = false;
                }
                _ => {}
            }
        }

        match best {
            // Ties at or above the floor resolve to Unknown rather than an
            // arbitrary winner.
            Some((document_type, score)) if score >= self.config.confidence_floor && !tied => {
                Classification {
                    document_type,
                    match_count: score,
                }
            }
            Some((_, score)) => Classification {
                document_type: DocumentType::Unknown,
                match_count: score,
            },
            None => Classification {
                document_type: DocumentType::Unknown,
                match_count: 0,
            },
        }
    }
}
