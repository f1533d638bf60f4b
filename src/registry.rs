//! The fixed catalog of game design document sections.
//!
//! The registry is a static table; [`SectionRegistry`] is the view the
//! assembler is handed, possibly filtered for a genre.

/// Metadata for one document section
#[derive(Debug)]
pub struct SectionDef {
    pub key: &'static str,
    pub name: &'static str,
    pub order: u8,
    pub required: bool,
    pub min_words: usize,
    pub recommended_words: &'static str,
    pub key_elements: &'static [&'static str],
    pub template_file: Option<&'static str>,
    /// `(genre keyword, note)` pairs.
    pub genre_adaptations: &'static [(&'static str, &'static str)],
    pub skip_conditions: &'static [&'static str],
}

impl SectionDef {
    /// Heading used for the section, e.g. `4. Core Gameplay Loop`.
    pub fn heading(&self) -> String {
        format!("{}. {}", self.order, self.name)
    }

    /// Adaptation notes whose keyword appears in the genre string.
    pub fn adaptations_for<'a>(
        &'a self,
        genre: &'a str,
    ) -> impl Iterator<Item = (&'static str, &'static str)> + 'a {
        let genre = genre.to_lowercase();
        self.genre_adaptations
            .iter()
            .copied()
            .filter(move |(keyword, _)| genre.contains(keyword))
    }
}

/// Human form of an element key: `xp_formula` -> `Xp Formula`.
pub fn element_title(element: &str) -> String {
    element
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, immutable set of sections handed to the assembler
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<&'static SectionDef>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SectionRegistry {
    /// All 19 sections in document order.
    pub fn standard() -> Self {
        let mut sections: Vec<&'static SectionDef> = SECTIONS.iter().collect();
        sections.sort_by_key(|s| s.order);
        Self { sections }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static SectionDef> + '_ {
        self.sections.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&'static SectionDef> {
        self.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn required(&self) -> impl Iterator<Item = &'static SectionDef> + '_ {
        self.iter().filter(|s| s.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &'static SectionDef> + '_ {
        self.iter().filter(|s| !s.required)
    }

    /// Drop sections whose skip conditions apply to a genre string such as
    /// `mobile_f2p` or `premium_singleplayer`.
    pub fn for_genre(&self, genre: &str) -> Self {
        let genre = genre.to_lowercase();
        let mut skip = Vec::new();

        if ["single_player", "narrative", "arcade", "puzzle"]
            .iter()
            .any(|g| genre.contains(g))
        {
            skip.push("single_player_only");
        }
        if ["premium", "paid"].iter().any(|g| genre.contains(g)) && !genre.contains("economy") {
            skip.push("premium_no_economy");
        }
        if genre.contains("no_narrative") || genre.contains("arcade") {
            skip.push("narrative_none");
        }

        let sections = self
            .iter()
            .filter(|s| !s.skip_conditions.iter().any(|c| skip.contains(c)))
            .collect();
        Self { sections }
    }

    /// Printable outline, one entry per section with its first elements.
    pub fn outline(&self) -> String {
        let mut out = String::from("# GDD Section Outline\n\n");
        for s in self.iter() {
            let req = if s.required { "Required" } else { "Optional" };
            out.push_str(&format!(
                "{:2}. **{}** ({req}) - {} words\n",
                s.order, s.name, s.recommended_words
            ));
            for element in s.key_elements.iter().take(3) {
                out.push_str(&format!("    - {}\n", element_title(element)));
            }
            if s.key_elements.len() > 3 {
                let more = s.key_elements.len() - 3;
                out.push_str(&format!("    - ... +{more} more elements\n"));
            }
            out.push('\n');
        }
        out
    }
}

static SECTIONS: [SectionDef; 19] = [
    SectionDef {
        key: "cover_page",
        name: "Cover Page",
        order: 1,
        required: true,
        min_words: 0,
        recommended_words: "N/A",
        key_elements: &[
            "game_title",
            "tagline",
            "genre_platform_audience",
            "version_number",
            "document_date",
            "studio_name",
            "lead_designers",
            "confidentiality_notice",
            "version_history_table",
        ],
        template_file: Some("assets/cover_page_spec.md"),
        genre_adaptations: &[],
        skip_conditions: &[],
    },
    SectionDef {
        key: "executive_summary",
        name: "Executive Summary",
        order: 2,
        required: true,
        min_words: 200,
        recommended_words: "400-600",
        key_elements: &[
            "elevator_pitch",
            "unique_value_proposition",
            "at_a_glance_table",
            "comparable_titles",
            "team_overview",
            "market_gap_statement",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("mobile_f2p", "Emphasize D1/D7/D30 retention targets and monetization KPIs"),
            ("esports", "Emphasize competitive scene potential and spectator support"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "game_overview",
        name: "Game Overview",
        order: 3,
        required: true,
        min_words: 400,
        recommended_words: "600-1000",
        key_elements: &[
            "high_concept_statement",
            "core_fantasy",
            "experience_pillars",
            "session_flow_narrative",
            "comparable_titles_analysis",
            "target_demographic",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("narrative", "Expand experience pillars to include story pillars"),
            ("mobile", "Emphasize session length targets"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "core_gameplay_loop",
        name: "Core Gameplay Loop",
        order: 4,
        required: true,
        min_words: 500,
        recommended_words: "800-1500",
        key_elements: &[
            "micro_loop",
            "macro_loop",
            "meta_loop",
            "loop_diagrams",
            "session_length_target",
            "engagement_hooks",
            "loop_failure_states",
            "loop_onboarding",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("idle", "Meta loop becomes primary focus; micro loop is minimal"),
            ("roguelike", "Death-and-restart is part of the loop; document meta-progression"),
            ("mobile", "Micro loop must fit 8-12 minute session target"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "game_mechanics",
        name: "Game Mechanics",
        order: 5,
        required: true,
        min_words: 800,
        recommended_words: "1500-3000",
        key_elements: &[
            "primary_interaction_mechanic",
            "movement_system",
            "resource_management",
            "upgrade_modification_mechanic",
            "social_interaction_mechanic",
            "economy_transaction_mechanic",
            "procedural_systems",
        ],
        template_file: Some("templates/mechanics_specification_template.md"),
        genre_adaptations: &[
            ("action", "Combat timing and input windows are critical; spec every frame"),
            ("strategy", "Decision trees and information availability are the core mechanic"),
            ("narrative", "Dialogue and choice systems are core mechanics"),
            ("idle", "Mechanic is minimal; focus on progression triggers"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "progression_system",
        name: "Progression System",
        order: 6,
        required: true,
        min_words: 400,
        recommended_words: "800-1500",
        key_elements: &[
            "progression_hierarchy",
            "xp_earn_rates_per_archetype",
            "time_to_milestone_table",
            "power_curve",
            "xp_formula",
            "content_gates",
            "catch_up_mechanisms",
            "prestige_endgame",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("arcade", "Progression is score-based, not level-based; simplify section"),
            ("mobile_f2p", "Progression gates drive monetization; document conversion touch points"),
            ("roguelike", "Per-run progression vs meta-progression; document both separately"),
        ],
        skip_conditions: &["arcade_no_progression"],
    },
    SectionDef {
        key: "content_design",
        name: "Content Design",
        order: 7,
        required: true,
        min_words: 400,
        recommended_words: "800-1500",
        key_elements: &[
            "content_scope_overview",
            "levels_zones_worlds",
            "enemy_npc_types",
            "items_equipment",
            "abilities_skills",
            "procedural_content_rules",
            "content_creation_guidelines",
            "launch_content_minimum",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("procedural", "Document generation rules and seed systems"),
            ("narrative", "Expand level design to include narrative beats per level"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "narrative_world",
        name: "Narrative & World",
        order: 8,
        required: false,
        min_words: 50,
        recommended_words: "500-1200",
        key_elements: &[
            "setting_overview",
            "lore_depth_classification",
            "story_structure",
            "key_characters",
            "narrative_gameplay_integration",
            "worldbuilding_constraints",
            "writing_tone_guide",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("narrative", "Expand to full story bible; include branching dialogue specification"),
            ("arcade", "Single paragraph stating narrative is minimal"),
            ("sports", "Setting is real-world; focus on presentation and commentary style"),
        ],
        skip_conditions: &["narrative_none"],
    },
    SectionDef {
        key: "ux_interface",
        name: "User Experience & Interface",
        order: 9,
        required: true,
        min_words: 400,
        recommended_words: "800-1500",
        key_elements: &[
            "screen_inventory",
            "ftue_flow",
            "hud_layout",
            "navigation_hierarchy",
            "accessibility_requirements",
        ],
        template_file: Some("templates/ux_flow_template.md"),
        genre_adaptations: &[
            ("mobile", "Thumb zones, portrait/landscape, gesture controls are mandatory"),
            ("vr", "Spatial UI replaces flat UI; comfort guidelines required"),
            ("console", "Controller navigation, platform UI guidelines (PS/Xbox/Switch)"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "art_direction",
        name: "Art Direction",
        order: 10,
        required: true,
        min_words: 300,
        recommended_words: "500-800",
        key_elements: &[
            "visual_style_statement",
            "visual_influences",
            "color_palette",
            "character_art_guidelines",
            "environment_art_guidelines",
            "ui_art_style",
            "animation_style",
            "do_not_create_list",
        ],
        template_file: Some("templates/art_direction_template.md"),
        genre_adaptations: &[
            ("vr", "Add comfort guidelines: motion sickness considerations for art choices"),
            ("mobile", "Performance constraints limit visual complexity; document poly budget"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "audio_design",
        name: "Audio Design",
        order: 11,
        required: true,
        min_words: 150,
        recommended_words: "300-500",
        key_elements: &[
            "music_direction",
            "sfx_philosophy",
            "voice_acting_scope",
            "adaptive_audio",
            "audio_budget",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("rhythm", "Audio is core mechanic; this section triples in length"),
            ("esports", "Competitive audio clarity is critical; callout audio spec required"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "multiplayer_design",
        name: "Multiplayer Design",
        order: 12,
        required: false,
        min_words: 400,
        recommended_words: "800-2000",
        key_elements: &[
            "network_model",
            "tick_rate",
            "matchmaking_system",
            "lobby_party_system",
            "social_features",
            "anti_cheat",
            "platform_requirements",
            "latency_tolerance",
            "disconnect_handling",
        ],
        template_file: Some("templates/technical_requirements_template.md"),
        genre_adaptations: &[
            ("competitive", "Ranked ladder, MMR system, seasonal resets are all required"),
            ("coop", "Async vs sync co-op distinction; difficulty scaling with player count"),
            ("mmo", "Expand into full MMO social architecture document"),
        ],
        skip_conditions: &["single_player_only"],
    },
    SectionDef {
        key: "monetization_strategy",
        name: "Monetization Strategy",
        order: 13,
        required: true,
        min_words: 300,
        recommended_words: "600-1200",
        key_elements: &[
            "revenue_model_selection",
            "player_segment_revenue_model",
            "iap_catalog",
            "premium_currency_rates",
            "battle_pass_structure",
            "ethical_guidelines",
            "regional_pricing",
            "kpi_targets",
        ],
        template_file: Some("templates/monetization_strategy_template.md"),
        genre_adaptations: &[
            ("premium", "Simplify to price point, DLC strategy, sale cadence"),
            ("mobile_f2p", "Expand to 4+ pages; live ops events monetization required"),
            ("esports", "Battle pass + cosmetics only; no gameplay advantages"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "economy_design",
        name: "Economy Design",
        order: 14,
        required: false,
        min_words: 300,
        recommended_words: "600-1200",
        key_elements: &[
            "currency_types",
            "faucet_sink_balance",
            "daily_earn_rates",
            "pricing_architecture",
            "inflation_risk_assessment",
            "exchange_rate_design",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[
            ("idle", "Economy is the entire game; expand to 8+ pages"),
            ("mmo", "Gold sink/faucet economy with player-driven market; complex document"),
        ],
        skip_conditions: &["premium_no_economy"],
    },
    SectionDef {
        key: "technical_requirements",
        name: "Technical Requirements",
        order: 15,
        required: true,
        min_words: 300,
        recommended_words: "500-1000",
        key_elements: &[
            "engine_selection",
            "platform_targets",
            "hardware_specifications",
            "network_architecture",
            "third_party_services",
            "analytics_events",
            "build_pipeline",
            "technical_risks",
        ],
        template_file: Some("templates/technical_requirements_template.md"),
        genre_adaptations: &[
            ("mobile", "Battery, thermal, and data usage specs required"),
            ("vr", "90Hz minimum, reprojection policy, comfort specs"),
        ],
        skip_conditions: &[],
    },
    SectionDef {
        key: "competitive_analysis",
        name: "Competitive Analysis",
        order: 16,
        required: true,
        min_words: 400,
        recommended_words: "600-1000",
        key_elements: &[
            "competitor_identification",
            "competitor_profiles",
            "feature_comparison_matrix",
            "positioning_map",
            "market_gap_analysis",
            "differentiation_statement",
            "lessons_learned",
            "market_timing",
        ],
        template_file: Some("templates/competitive_analysis_template.md"),
        genre_adaptations: &[],
        skip_conditions: &[],
    },
    SectionDef {
        key: "development_roadmap",
        name: "Development Roadmap",
        order: 17,
        required: true,
        min_words: 200,
        recommended_words: "400-800",
        key_elements: &[
            "prototype_milestone",
            "vertical_slice_milestone",
            "alpha_milestone",
            "beta_milestone",
            "launch_milestone",
            "post_launch_plan",
            "critical_path",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[(
            "live_service",
            "Post-launch live ops calendar is as important as launch milestone",
        )],
        skip_conditions: &[],
    },
    SectionDef {
        key: "risk_assessment",
        name: "Risk Assessment",
        order: 18,
        required: true,
        min_words: 200,
        recommended_words: "400-600",
        key_elements: &[
            "risk_register_table",
            "design_risks",
            "technical_risks",
            "market_risks",
            "team_risks",
            "external_risks",
        ],
        template_file: Some("templates/gdd_master_structure.md"),
        genre_adaptations: &[],
        skip_conditions: &[],
    },
    SectionDef {
        key: "appendices",
        name: "Appendices",
        order: 19,
        required: true,
        min_words: 100,
        recommended_words: "As needed",
        key_elements: &["glossary", "revision_history", "open_questions_log"],
        template_file: None,
        genre_adaptations: &[],
        skip_conditions: &[],
    },
];
