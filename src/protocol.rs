//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Assessment, BankSource, ContentPage, PointsEntry, Question, ResultRecord, TraitScores, User,
    UserKind,
};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewGuest,
    Register {
        name: String,
    },
    Login {
        #[serde(rename = "userId")]
        user_id: String,
    },
    GetAssessment {
        #[serde(rename = "assessmentId")]
        assessment_id: Option<String>,
    },
    SubmitAnswers {
        #[serde(rename = "assessmentId")]
        assessment_id: Option<String>,
        #[serde(rename = "userId")]
        user_id: String,
        answers: Vec<String>,
    },
    GetResult {
        #[serde(rename = "userId")]
        user_id: String,
    },
    ListContent,
    ReadContent {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "pageId")]
        page_id: String,
    },
    GetPoints {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    User {
        user: UserOut,
        #[serde(rename = "pointsAwarded")]
        points_awarded: Option<PointsEntryOut>,
    },
    Assessment {
        assessment: AssessmentOut,
    },
    Result {
        result: ResultOut,
        #[serde(rename = "pointsAwarded")]
        points_awarded: Option<PointsEntryOut>,
    },
    ContentList {
        pages: Vec<ContentSummaryOut>,
    },
    Content {
        page: ContentPageOut,
        #[serde(rename = "pointsAwarded")]
        points_awarded: Option<PointsEntryOut>,
    },
    Points {
        summary: PointsOut,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for assessment delivery.
#[derive(Debug, Serialize)]
pub struct AssessmentOut {
    pub id: String,
    pub title: String,
    pub source: BankSource,
    pub questions: Vec<QuestionOut>,
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub dimension: String,
    pub prompt: String,
    pub options: Vec<OptionOut>,
}

#[derive(Debug, Serialize)]
pub struct OptionOut {
    pub letter: char,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ResultOut {
    pub id: String,
    #[serde(rename = "assessmentId")]
    pub assessment_id: String,
    pub scores: TraitScores,
    #[serde(rename = "primaryType")]
    pub primary_type: String,
    #[serde(rename = "alternativeTypes")]
    pub alternative_types: Vec<String>,
    pub active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: String,
    pub kind: UserKind,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PointsEntryOut {
    pub action: String,
    pub points: u32,
    pub day: String,
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PointsOut {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub total: u32,
    pub entries: Vec<PointsEntryOut>,
}

#[derive(Debug, Serialize)]
pub struct ContentSummaryOut {
    pub id: String,
    pub title: String,
    #[serde(rename = "typeCode")]
    pub type_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentPageOut {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "typeCode")]
    pub type_code: Option<String>,
}

/// Convert full `Assessment` (internal) to the public DTO.
pub fn assessment_out(a: &Assessment) -> AssessmentOut {
    AssessmentOut {
        id: a.id.clone(),
        title: a.title.clone(),
        source: a.source.clone(),
        questions: a.questions.iter().map(question_out).collect(),
    }
}

fn question_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        dimension: q.dimension.label().to_string(),
        prompt: q.prompt.clone(),
        options: q
            .options
            .iter()
            .map(|o| OptionOut { letter: o.letter, label: o.label.clone() })
            .collect(),
    }
}

pub fn result_out(r: &ResultRecord) -> ResultOut {
    ResultOut {
        id: r.id.clone(),
        assessment_id: r.assessment_id.clone(),
        scores: r.scores,
        primary_type: r.primary_type.clone(),
        alternative_types: r.alternative_types.clone(),
        active: r.active,
        created_at: r.created_at.to_rfc3339(),
    }
}

pub fn user_out(u: &User) -> UserOut {
    UserOut { id: u.id.clone(), kind: u.kind, name: u.name.clone() }
}

pub fn points_entry_out(e: &PointsEntry) -> PointsEntryOut {
    PointsEntryOut {
        action: e.action.label().to_string(),
        points: e.points,
        day: e.day.to_string(),
        reference: e.reference.clone(),
    }
}

pub fn content_summary_out(p: &ContentPage) -> ContentSummaryOut {
    ContentSummaryOut { id: p.id.clone(), title: p.title.clone(), type_code: p.type_code.clone() }
}

pub fn content_page_out(p: &ContentPage) -> ContentPageOut {
    ContentPageOut {
        id: p.id.clone(),
        title: p.title.clone(),
        body: p.body.clone(),
        type_code: p.type_code.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AssessmentQuery {
    #[serde(rename = "assessmentId")]
    pub assessment_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SubmitIn {
    #[serde(rename = "assessmentId")]
    pub assessment_id: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub answers: Vec<String>,
}

#[derive(Deserialize)]
pub struct RegisterIn {
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginIn {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "pageId")]
    pub page_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ReadContentIn {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "pageId")]
    pub page_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PointsQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
