//! Seed data and small utilities related to default content.

use crate::domain::{
  Assessment, BankSource, ContentPage, Dimension, Question, QuestionOption,
};

pub const SEED_ASSESSMENT_ID: &str = "a100";

fn q(id: &str, dim: Dimension, prompt: &str, first: &str, second: &str) -> Question {
  let letters = dim.letters();
  Question {
    id: id.into(),
    dimension: dim,
    prompt: prompt.into(),
    options: vec![
      QuestionOption { letter: letters[0], label: first.into() },
      QuestionOption { letter: letters[1], label: second.into() },
    ],
  }
}

/// The built-in 20-question assessment (5 questions per dimension) that
/// guarantees the app is useful even without external config.
pub fn seed_assessment() -> Assessment {
  Assessment {
    id: SEED_ASSESSMENT_ID.into(),
    title: "Personality type assessment".into(),
    source: BankSource::Seed,
    questions: vec![
      // EI
      q("q101", Dimension::Ei, "After a long week, you recharge best by…",
        "Going out with friends", "Spending quiet time alone"),
      q("q102", Dimension::Ei, "At a party where you know few people, you…",
        "Introduce yourself around", "Stay close to the people you came with"),
      q("q103", Dimension::Ei, "When working through a problem, you prefer to…",
        "Talk it out loud with others", "Think it through before speaking"),
      q("q104", Dimension::Ei, "Your ideal weekend involves…",
        "A full calendar of plans", "Plenty of unscheduled downtime"),
      q("q105", Dimension::Ei, "In group discussions, you tend to…",
        "Jump in early and often", "Listen first and contribute selectively"),
      // SN
      q("q106", Dimension::Sn, "When learning something new, you focus on…",
        "Concrete facts and examples", "Underlying patterns and possibilities"),
      q("q107", Dimension::Sn, "You trust information more when it is…",
        "Drawn from direct experience", "Consistent with a bigger theory"),
      q("q108", Dimension::Sn, "Instructions are most useful to you when they are…",
        "Step-by-step and specific", "Goal-oriented, leaving room to improvise"),
      q("q109", Dimension::Sn, "In conversation you are more drawn to…",
        "What actually happened", "What it could mean or lead to"),
      q("q110", Dimension::Sn, "When planning a trip, you care most about…",
        "The practical details", "The overall experience you imagine"),
      // TF
      q("q111", Dimension::Tf, "When a friend brings you a problem, you first…",
        "Look for a workable fix", "Make sure they feel heard"),
      q("q112", Dimension::Tf, "Hard decisions should mostly weigh…",
        "Objective pros and cons", "The people affected"),
      q("q113", Dimension::Tf, "Honest feedback should be…",
        "Direct, even if it stings", "Softened to protect the relationship"),
      q("q114", Dimension::Tf, "In a heated debate, you value…",
        "Being right on the merits", "Keeping the group on good terms"),
      q("q115", Dimension::Tf, "You would rather be seen as…",
        "Fair and consistent", "Warm and compassionate"),
      // JP
      q("q116", Dimension::Jp, "Your approach to deadlines is to…",
        "Finish early with room to spare", "Ride the energy of the last minute"),
      q("q117", Dimension::Jp, "Your workspace is usually…",
        "Tidy with everything in its place", "An organized mess that works for you"),
      q("q118", Dimension::Jp, "Plans that change at the last minute are…",
        "Frustrating", "Part of the fun"),
      q("q119", Dimension::Jp, "Before starting a project, you prefer to…",
        "Lay out the steps in advance", "Dive in and figure it out as you go"),
      q("q120", Dimension::Jp, "An open evening with nothing scheduled feels…",
        "Slightly uncomfortable", "Like freedom"),
    ],
  }
}

/// Minimal set of built-in reading pages so the content endpoints and
/// content-read points work out of the box.
pub fn seed_content() -> Vec<ContentPage> {
  vec![
    ContentPage {
      id: "p100".into(),
      title: "The four dimensions".into(),
      body: "Every result combines four preferences: where you draw energy \
             (E/I), how you take in information (S/N), how you decide (T/F), \
             and how you organize your outer life (J/P). None of the poles is \
             better than its opposite; the pair percentages show how decisive \
             each preference was in your answers.".into(),
      source: BankSource::Seed,
      type_code: None,
    },
    ContentPage {
      id: "p101".into(),
      title: "INTJ — The Strategist".into(),
      body: "INTJs pair a long planning horizon with a taste for systems. \
             They trust internal models over convention, work best with \
             autonomy, and tend to measure ideas by whether they survive \
             contact with logic.".into(),
      source: BankSource::Seed,
      type_code: Some("INTJ".into()),
    },
    ContentPage {
      id: "p102".into(),
      title: "ENFP — The Spark".into(),
      body: "ENFPs lead with enthusiasm and possibility. They read people \
             quickly, start more projects than they finish, and bring an \
             infectious energy to groups that thrive on new directions.".into(),
      source: BankSource::Seed,
      type_code: Some("ENFP".into()),
    },
    ContentPage {
      id: "p103".into(),
      title: "ISTJ — The Anchor".into(),
      body: "ISTJs value reliability above flash. They remember what worked \
             before, honor their commitments, and quietly keep the systems \
             around them running on time.".into(),
      source: BankSource::Seed,
      type_code: Some("ISTJ".into()),
    },
    ContentPage {
      id: "p104".into(),
      title: "ESFJ — The Host".into(),
      body: "ESFJs organize the social fabric. They notice who needs what, \
             keep traditions alive, and do the practical caretaking that \
             holds teams and families together.".into(),
      source: BankSource::Seed,
      type_code: Some("ESFJ".into()),
    },
  ]
}
