//! Rule-based specialist recommendations.
//!
//! Produces a `doctor_recommendations` payload from a validated report. The
//! payload uses the same string shape an external source would send, so it
//! goes through `analysis::triage` like any other hint. Health tips per
//! detected condition and doctor-finder links live here too.

use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::analysis::Specialist;
use crate::config::EngineConfig;
use crate::models::{
    RawRecommendations, RawSpecialist, Report, SpecialistPriority, TestResult, TestStatus, Urgency,
};

const PRIMARY_CARE: &str = "Primary Care Physician";

/// What one abnormal result contributes for one specialist.
#[derive(Debug, Default)]
struct Finding {
    reason: Option<String>,
    escalate_to: Option<Urgency>,
    /// Prepended ahead of every other reason.
    urgent_condition: Option<&'static str>,
}

impl Finding {
    fn reason(text: impl Into<String>) -> Self {
        Self {
            reason: Some(text.into()),
            ..Self::default()
        }
    }

    fn escalate(mut self, urgency: Urgency) -> Self {
        self.escalate_to = Some(urgency);
        self
    }
}

struct SpecialistRule {
    name: &'static str,
    tests: &'static [&'static str],
    /// Only High results count (Low inflammation or tumor markers are benign).
    high_only: bool,
    assess: fn(&TestResult) -> Finding,
}

const RULES: &[SpecialistRule] = &[
    SpecialistRule {
        name: "Cardiologist",
        tests: &[
            "Troponin", "BNP", "NT_proBNP", "CK_MB", "Cholesterol", "LDL", "HDL", "Triglycerides",
        ],
        high_only: false,
        assess: assess_cardiac,
    },
    SpecialistRule {
        name: "Nephrologist",
        tests: &["Creatinine", "BUN", "Urea", "Urine_Protein", "Urine_Blood", "Potassium"],
        high_only: false,
        assess: assess_renal,
    },
    SpecialistRule {
        name: "Endocrinologist",
        tests: &[
            "TSH", "T3", "T4", "Free_T3", "Free_T4", "HbA1c", "Glucose", "Insulin",
            "Testosterone_Total", "Estradiol", "Cortisol", "DHEA_S",
        ],
        high_only: false,
        assess: assess_endocrine,
    },
    SpecialistRule {
        name: "Hepatologist",
        tests: &[
            "ALT", "AST", "Alkaline_Phosphatase", "GGT", "Total_Bilirubin", "Direct_Bilirubin",
            "Albumin", "Total_Protein",
        ],
        high_only: false,
        assess: assess_liver,
    },
    SpecialistRule {
        name: "Hematologist",
        tests: &[
            "Hemoglobin", "WBC", "RBC", "Platelets", "Ferritin", "Iron", "TIBC", "MCV", "MCH",
            "MCHC", "RDW",
        ],
        high_only: false,
        assess: assess_blood,
    },
    SpecialistRule {
        name: "Urologist",
        tests: &["PSA", "Urine_WBC", "Urine_RBC", "Urine_Bacteria", "Urine_Nitrite"],
        high_only: false,
        assess: assess_urinary,
    },
    SpecialistRule {
        name: "Rheumatologist",
        tests: &["CRP", "ESR", "Uric_Acid"],
        high_only: true,
        assess: assess_inflammation,
    },
    SpecialistRule {
        name: "Oncologist",
        tests: &["CEA", "CA_125", "CA_19_9", "AFP", "PSA"],
        high_only: true,
        assess: assess_tumor_marker,
    },
];

fn assess_cardiac(r: &TestResult) -> Finding {
    let high = r.status == TestStatus::High;
    match r.test.as_str() {
        "Troponin" if high => Finding {
            urgent_condition: Some("Possible heart attack - EMERGENCY"),
            escalate_to: Some(Urgency::Emergency),
            ..Finding::default()
        },
        "BNP" | "NT_proBNP" if high => Finding::reason("Elevated heart failure markers"),
        "Cholesterol" | "LDL" | "Triglycerides" if high => {
            Finding::reason("High cardiovascular risk factors")
        }
        _ => Finding::default(),
    }
}

fn assess_renal(r: &TestResult) -> Finding {
    let high = r.status == TestStatus::High;
    match r.test.as_str() {
        "Urine_Protein" if high => Finding::reason("Protein in urine - possible kidney disease"),
        "Creatinine" | "BUN" if high => Finding::reason("Elevated kidney function markers"),
        _ => Finding::default(),
    }
}

fn assess_endocrine(r: &TestResult) -> Finding {
    match r.test.as_str() {
        "HbA1c" if r.value > 6.5 => Finding::reason("Diabetes diagnosis - needs management"),
        "TSH" | "T3" | "T4" => Finding::reason("Thyroid dysfunction detected"),
        "Testosterone_Total" | "Estradiol" => Finding::reason("Hormonal imbalance detected"),
        _ => Finding::default(),
    }
}

fn assess_liver(r: &TestResult) -> Finding {
    match r.test.as_str() {
        "ALT" | "AST" if r.value > 100.0 => Finding::reason("Significantly elevated liver enzymes"),
        "Total_Bilirubin" if r.status == TestStatus::High => {
            Finding::reason("Elevated bilirubin - possible liver/bile duct issue")
        }
        _ => Finding::default(),
    }
}

fn assess_blood(r: &TestResult) -> Finding {
    match r.test.as_str() {
        "Hemoglobin" if r.value < 8.0 => {
            Finding::reason("Severe anemia - needs urgent evaluation").escalate(Urgency::Urgent)
        }
        "WBC" if r.value < 2000.0 || r.value > 20000.0 => {
            Finding::reason("Abnormal white blood cell count")
        }
        "Platelets" if r.value < 50000.0 => {
            Finding::reason("Low platelet count - bleeding risk").escalate(Urgency::Urgent)
        }
        _ => Finding::default(),
    }
}

fn assess_urinary(r: &TestResult) -> Finding {
    match r.test.as_str() {
        "PSA" if r.value > 4.0 => Finding::reason("Elevated PSA - prostate evaluation needed"),
        "Urine_WBC" | "Urine_Bacteria" if r.status == TestStatus::High => {
            Finding::reason("Urinary tract infection detected")
        }
        _ => Finding::default(),
    }
}

fn assess_inflammation(r: &TestResult) -> Finding {
    match r.test.as_str() {
        "Uric_Acid" if r.value > 8.0 => Finding::reason("High uric acid - gout risk"),
        "CRP" | "ESR" => Finding::reason("Elevated inflammation markers"),
        _ => Finding::default(),
    }
}

fn assess_tumor_marker(r: &TestResult) -> Finding {
    Finding::reason(format!("Elevated tumor marker: {}", r.test)).escalate(Urgency::Urgent)
}

/// Derive specialist referrals, urgency, reasons and next steps from the
/// abnormal results of a report.
///
/// Specialists are ranked by how many abnormal tests point at them (ties keep
/// first-seen order) and capped at `config.max_specialists`. Urgency only ever
/// escalates. Duplicate reasons are dropped.
pub fn recommend_specialists(report: &Report, config: &EngineConfig) -> RawRecommendations {
    let mut tallies: Vec<(&'static str, u32)> = Vec::new();
    let mut urgency = Urgency::Routine;
    let mut reasons: Vec<String> = Vec::new();
    let mut urgent_conditions: Vec<String> = Vec::new();

    for result in report.iter().filter(|r| r.status.is_abnormal()) {
        for rule in RULES {
            if !rule.tests.contains(&result.test.as_str()) {
                continue;
            }
            if rule.high_only && result.status != TestStatus::High {
                continue;
            }

            match tallies.iter_mut().find(|(name, _)| *name == rule.name) {
                Some((_, count)) => *count += 1,
                None => tallies.push((rule.name, 1)),
            }

            let finding = (rule.assess)(result);
            if let Some(level) = finding.escalate_to {
                urgency = urgency.max(level);
            }
            if let Some(condition) = finding.urgent_condition {
                push_unique(&mut urgent_conditions, condition.to_string());
            }
            if let Some(reason) = finding.reason {
                push_unique(&mut reasons, reason);
            }
        }
    }

    // stable: equal tallies keep first-seen order
    tallies.sort_by(|a, b| b.1.cmp(&a.1));

    let mut specialists: Vec<RawSpecialist> = tallies
        .into_iter()
        .take(config.max_specialists)
        .map(|(name, count)| RawSpecialist {
            name: name.to_string(),
            priority: SpecialistPriority::from_reason_count(count).as_str().to_string(),
            reason_count: count,
        })
        .collect();

    if specialists.is_empty() {
        specialists.push(RawSpecialist {
            name: PRIMARY_CARE.to_string(),
            priority: SpecialistPriority::Medium.as_str().to_string(),
            reason_count: 1,
        });
        reasons.push("General health consultation recommended".to_string());
    }

    urgent_conditions.extend(reasons);

    tracing::debug!(
        urgency = %urgency,
        specialists = specialists.len(),
        reasons = urgent_conditions.len(),
        "Specialist recommendations derived"
    );

    RawRecommendations {
        urgency: urgency.as_str().to_string(),
        reasons: urgent_conditions,
        specialists,
        next_steps: urgency.default_next_steps(),
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn keywords_for(specialist: &str) -> &'static [&'static str] {
    match specialist {
        "Cardiologist" => &["cardiologist", "heart doctor", "cardiovascular specialist"],
        "Nephrologist" => &["nephrologist", "kidney specialist", "renal doctor"],
        "Endocrinologist" => &[
            "endocrinologist",
            "diabetes doctor",
            "hormone specialist",
            "thyroid doctor",
        ],
        "Hepatologist" => &["hepatologist", "liver specialist", "gastroenterologist"],
        "Hematologist" => &["hematologist", "blood specialist", "blood disorder doctor"],
        "Urologist" => &["urologist", "urinary specialist", "prostate doctor"],
        "Rheumatologist" => &["rheumatologist", "arthritis doctor", "autoimmune specialist"],
        "Oncologist" => &["oncologist", "cancer specialist", "cancer doctor"],
        PRIMARY_CARE => &["primary care", "general practitioner", "family doctor", "GP"],
        _ => &[],
    }
}

/// Directory search terms for the recommended specialists, de-duplicated in
/// first-seen order.
pub fn search_keywords(specialists: &[Specialist]) -> Vec<String> {
    let mut seen = HashSet::new();
    specialists
        .iter()
        .flat_map(|s| keywords_for(&s.name).iter().copied())
        .filter(|k| seen.insert(*k))
        .map(str::to_string)
        .collect()
}

/// Condition inferred from abnormal results, used to pick lifestyle tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    HighCholesterol,
    Diabetes,
    KidneyIssues,
    LiverIssues,
    Anemia,
    ThyroidIssues,
    Uti,
}

impl Condition {
    fn detect(r: &TestResult) -> Option<Self> {
        let high = r.status == TestStatus::High;
        match r.test.as_str() {
            "Cholesterol" | "LDL" | "Triglycerides" if high => Some(Self::HighCholesterol),
            "Glucose" | "HbA1c" if high => Some(Self::Diabetes),
            "Creatinine" | "BUN" | "Urine_Protein" if high => Some(Self::KidneyIssues),
            "ALT" | "AST" | "GGT" if high => Some(Self::LiverIssues),
            "Hemoglobin" if r.status == TestStatus::Low => Some(Self::Anemia),
            "TSH" | "T4" if r.status.is_abnormal() => Some(Self::ThyroidIssues),
            "Urine_WBC" | "Urine_Bacteria" if high => Some(Self::Uti),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::HighCholesterol => "💛 Managing High Cholesterol",
            Self::Diabetes => "🍬 Managing Blood Sugar",
            Self::KidneyIssues => "🫘 Protecting Your Kidneys",
            Self::LiverIssues => "🧪 Supporting Liver Health",
            Self::Anemia => "🔴 Treating Anemia",
            Self::ThyroidIssues => "🦋 Managing Thyroid Health",
            Self::Uti => "💧 Treating UTI",
        }
    }

    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            Self::HighCholesterol => &[
                "Eat more fiber: oats, beans, fruits, vegetables",
                "Choose healthy fats: olive oil, avocados, nuts",
                "Limit saturated fats: red meat, butter, cheese",
                "Exercise 30 minutes daily",
                "Maintain healthy weight",
                "Consider plant sterols supplements",
                "Quit smoking if applicable",
            ],
            Self::Diabetes => &[
                "Monitor blood sugar regularly",
                "Eat low glycemic index foods",
                "Control portion sizes",
                "Exercise regularly (150 min/week)",
                "Stay hydrated with water",
                "Avoid sugary drinks and processed foods",
                "Take medications as prescribed",
                "Check feet daily for wounds",
            ],
            Self::KidneyIssues => &[
                "Drink plenty of water (8-10 glasses daily)",
                "Limit sodium intake (<2,300mg/day)",
                "Control blood pressure",
                "Manage blood sugar if diabetic",
                "Avoid NSAIDs (ibuprofen, aspirin)",
                "Limit protein if advised by doctor",
                "Monitor kidney function regularly",
            ],
            Self::LiverIssues => &[
                "Avoid alcohol completely",
                "Maintain healthy weight",
                "Eat liver-friendly foods: leafy greens, berries",
                "Avoid processed foods and excess sugar",
                "Stay hydrated",
                "Avoid unnecessary medications",
                "Get vaccinated for hepatitis A & B",
                "Exercise regularly",
            ],
            Self::Anemia => &[
                "Eat iron-rich foods: red meat, spinach, beans",
                "Take vitamin C with iron for better absorption",
                "Avoid tea/coffee with meals",
                "Consider iron supplements (consult doctor)",
                "Eat vitamin B12: eggs, dairy, fish",
                "Include folate: leafy greens, citrus",
                "Cook in cast iron cookware",
            ],
            Self::ThyroidIssues => &[
                "Take thyroid medication as prescribed",
                "Take medication on empty stomach",
                "Avoid soy products near medication time",
                "Get adequate iodine (but not excessive)",
                "Manage stress levels",
                "Get regular thyroid function tests",
                "Maintain healthy weight",
            ],
            Self::Uti => &[
                "Drink plenty of water (flush bacteria)",
                "Urinate frequently, don't hold it",
                "Take full course of antibiotics",
                "Drink cranberry juice (unsweetened)",
                "Avoid irritants: caffeine, alcohol, spicy foods",
                "Wipe front to back (women)",
                "Urinate after sexual activity",
                "Wear cotton underwear",
            ],
        }
    }
}

/// One card of lifestyle advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthTip {
    pub condition: Condition,
    pub title: &'static str,
    pub tips: &'static [&'static str],
}

/// Tips for every condition the abnormal results point at, one card per
/// condition, in the order conditions are first detected.
pub fn health_tips(report: &Report) -> Vec<HealthTip> {
    let mut seen = HashSet::new();
    report
        .iter()
        .filter_map(Condition::detect)
        .filter(|c| seen.insert(*c))
        .map(|condition| HealthTip {
            condition,
            title: condition.title(),
            tips: condition.tips(),
        })
        .collect()
}

/// Characters left as-is by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(component: &str) -> String {
    utf8_percent_encode(component, URI_COMPONENT).to_string()
}

/// Directory sites a specialist search can be opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinderSite {
    Google,
    Healthgrades,
    Zocdoc,
    Vitals,
}

impl FinderSite {
    pub const ALL: [FinderSite; 4] = [Self::Google, Self::Healthgrades, Self::Zocdoc, Self::Vitals];

    fn url(&self, name: &str, location: &str) -> String {
        match self {
            Self::Google => format!(
                "https://www.google.com/search?q={}",
                encode(&format!("{name} near {location}"))
            ),
            Self::Healthgrades => format!(
                "https://www.healthgrades.com/search?what={}&where={}",
                encode(name),
                encode(location)
            ),
            Self::Zocdoc => format!(
                "https://www.zocdoc.com/search/?dr_specialty=&insurance_carrier=&search_query={}&address={}",
                encode(name),
                encode(location)
            ),
            Self::Vitals => format!(
                "https://www.vitals.com/search?type=specialty&q={}&loc={}",
                encode(name),
                encode(location)
            ),
        }
    }
}

/// Search links for finding `name` near `location` on each directory site.
/// `None` when the location is blank.
pub fn finder_urls(name: &str, location: &str) -> Option<Vec<(FinderSite, String)>> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    Some(
        FinderSite::ALL
            .iter()
            .map(|site| (*site, site.url(name, location)))
            .collect(),
    )
}
