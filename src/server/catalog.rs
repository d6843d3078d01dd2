use serde::Serialize;
use std::collections::BTreeMap;

// This data would typically come from a database; it is kept inline until
// one backs these pages.

#[derive(Serialize, Debug, Clone)]
pub struct SiteInfo {
    pub name: &'static str,
    pub tagline: &'static str,
    pub vision: &'static str,
    pub features: Vec<Feature>,
    pub about: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStats {
    pub total_solutions: u32,
    pub year_distribution: BTreeMap<&'static str, u32>,
    pub tool_types: BTreeMap<&'static str, u32>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ToolEntry {
    pub name: &'static str,
    pub input: &'static str,
    pub description: &'static str,
    pub output: &'static str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DocStats {
    pub total_docs: u32,
    pub source_distribution: BTreeMap<&'static str, u32>,
}

pub fn site_info() -> SiteInfo {
    SiteInfo {
        name: "BioinfoGPT",
        tagline: "Your intelligent assistant for bioinformatics research",
        vision: "BioinfoGPT aims to be an efficient and convenient research assistant in the \
                 field of bioinformatics, providing intelligent support for learning and \
                 analysis in medical bioinformatics research.",
        features: vec![
            Feature {
                title: "Intelligent Tool Recommendations",
                description: "Get personalized recommendations for bioinformatics software \
                              tools based on your research needs.",
            },
            Feature {
                title: "Smart Documentation Q&A",
                description: "Ask questions about tool usage and get instant, accurate answers \
                              from our intelligent system.",
            },
            Feature {
                title: "Bioinformatics Database Queries",
                description: "Effortlessly query and retrieve information from various \
                              bioinformatics databases.",
            },
        ],
        about: "BioinfoGPT is developed by a team of passionate bioinformaticians and AI \
                researchers dedicated to advancing the field of bioinformatics through \
                innovative technologies.",
    }
}

pub fn solution_stats() -> SolutionStats {
    SolutionStats {
        total_solutions: 1000,
        year_distribution: BTreeMap::from([
            ("2023", 300),
            ("2022", 250),
            ("2021", 200),
        ]),
        tool_types: BTreeMap::from([
            ("Sequence Analysis", 200),
            ("Structural Biology", 150),
            ("Genomics", 300),
        ]),
    }
}

pub fn tool_entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry {
            name: "BLAST",
            input: "DNA or protein sequence",
            description: "Basic Local Alignment Search Tool for finding regions of similarity \
                          between biological sequences",
            output: "Sequence alignments and similarity scores",
        },
        ToolEntry {
            name: "HMMER",
            input: "Protein sequence or multiple sequence alignment",
            description: "Hidden Markov Model-based sequence analysis tool for protein \
                          sequence analysis",
            output: "Profile HMMs, sequence alignments, and homology detection results",
        },
    ]
}

pub fn doc_stats() -> DocStats {
    DocStats {
        total_docs: 500,
        source_distribution: BTreeMap::from([
            ("Official Documentation", 200),
            ("Research Papers", 150),
            ("Tutorials", 100),
            ("User Guides", 50),
        ]),
    }
}
