use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A key string did not match any known variant.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {kind} key: {value:?}")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseKeyError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The catalog processes. A closed set: process graphs are compiled in,
/// not user-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessKey {
    /// Leave request approval.
    #[serde(rename = "leave_request")]
    LeaveRequest,
    /// Change of employment conditions.
    #[serde(rename = "change_employment")]
    EmploymentChange,
    /// Decoration and medal nominations.
    #[serde(rename = "decorations")]
    Decorations,
}

impl ProcessKey {
    pub const ALL: [ProcessKey; 3] = [
        ProcessKey::LeaveRequest,
        ProcessKey::EmploymentChange,
        ProcessKey::Decorations,
    ];

    /// Canonical wire string, as stored and exchanged with clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKey::LeaveRequest => "leave_request",
            ProcessKey::EmploymentChange => "change_employment",
            ProcessKey::Decorations => "decorations",
        }
    }
}

impl fmt::Display for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leave_request" => Ok(ProcessKey::LeaveRequest),
            "change_employment" => Ok(ProcessKey::EmploymentChange),
            "decorations" => Ok(ProcessKey::Decorations),
            other => Err(ParseKeyError::new("process", other)),
        }
    }
}

/// Task definition keys across all catalog processes. Keys identify a step
/// in a graph; display names live on the process definition, because two
/// processes may share a key but label it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKey {
    #[serde(rename = "Task_ReviewAndForward_HeadOU")]
    ReviewAndForwardHeadOu,
    #[serde(rename = "Task_ReviewApplication_PD")]
    ReviewApplicationPd,
    #[serde(rename = "Task_Review_PRK")]
    ReviewPrk,
    #[serde(rename = "Task_Review_PRN")]
    ReviewPrn,
    #[serde(rename = "Task_MakeDecision_RKR")]
    MakeDecisionRkr,
    #[serde(rename = "Task_MakeDecision_Chancellor")]
    MakeDecisionChancellor,
    #[serde(rename = "Task_InformHeadOU")]
    InformHeadOu,
    #[serde(rename = "Task_ImplementChanges")]
    ImplementChanges,
    #[serde(rename = "Task_Review_KWE")]
    ReviewKwe,
    #[serde(rename = "Task_ImplementAndPrepare")]
    ImplementAndPrepare,
    #[serde(rename = "Task_HandOverAndArchive")]
    HandOverAndArchive,
    /// Decoration nomination form. Captured on the start form, so the
    /// decorations graph never instantiates it as a task.
    #[serde(rename = "Task_SubmitApplication")]
    SubmitApplication,
    #[serde(rename = "Task_PresentApplicationsForAcceptance")]
    PresentForAcceptance,
    #[serde(rename = "Task_ReviewApplications")]
    ReviewApplications,
    #[serde(rename = "Task_PresentApplicationsToRKR")]
    PresentToRector,
    #[serde(rename = "Task_MakeDecision")]
    MakeDecision,
    #[serde(rename = "Task_ForwardApplicationsToMPD")]
    ForwardToMpd,
    #[serde(rename = "Task_HandleApplicationsExternal")]
    HandleExternal,
    #[serde(rename = "Task_ReceiveDecision")]
    ReceiveDecision,
    #[serde(rename = "Task_EnterToRegister")]
    EnterToRegister,
}

impl TaskKey {
    /// Canonical wire string, as stored and exchanged with clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKey::ReviewAndForwardHeadOu => "Task_ReviewAndForward_HeadOU",
            TaskKey::ReviewApplicationPd => "Task_ReviewApplication_PD",
            TaskKey::ReviewPrk => "Task_Review_PRK",
            TaskKey::ReviewPrn => "Task_Review_PRN",
            TaskKey::MakeDecisionRkr => "Task_MakeDecision_RKR",
            TaskKey::MakeDecisionChancellor => "Task_MakeDecision_Chancellor",
            TaskKey::InformHeadOu => "Task_InformHeadOU",
            TaskKey::ImplementChanges => "Task_ImplementChanges",
            TaskKey::ReviewKwe => "Task_Review_KWE",
            TaskKey::ImplementAndPrepare => "Task_ImplementAndPrepare",
            TaskKey::HandOverAndArchive => "Task_HandOverAndArchive",
            TaskKey::SubmitApplication => "Task_SubmitApplication",
            TaskKey::PresentForAcceptance => "Task_PresentApplicationsForAcceptance",
            TaskKey::ReviewApplications => "Task_ReviewApplications",
            TaskKey::PresentToRector => "Task_PresentApplicationsToRKR",
            TaskKey::MakeDecision => "Task_MakeDecision",
            TaskKey::ForwardToMpd => "Task_ForwardApplicationsToMPD",
            TaskKey::HandleExternal => "Task_HandleApplicationsExternal",
            TaskKey::ReceiveDecision => "Task_ReceiveDecision",
            TaskKey::EnterToRegister => "Task_EnterToRegister",
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Task_ReviewAndForward_HeadOU" => Ok(TaskKey::ReviewAndForwardHeadOu),
            "Task_ReviewApplication_PD" => Ok(TaskKey::ReviewApplicationPd),
            "Task_Review_PRK" => Ok(TaskKey::ReviewPrk),
            "Task_Review_PRN" => Ok(TaskKey::ReviewPrn),
            "Task_MakeDecision_RKR" => Ok(TaskKey::MakeDecisionRkr),
            "Task_MakeDecision_Chancellor" => Ok(TaskKey::MakeDecisionChancellor),
            "Task_InformHeadOU" => Ok(TaskKey::InformHeadOu),
            "Task_ImplementChanges" => Ok(TaskKey::ImplementChanges),
            "Task_Review_KWE" => Ok(TaskKey::ReviewKwe),
            "Task_ImplementAndPrepare" => Ok(TaskKey::ImplementAndPrepare),
            "Task_HandOverAndArchive" => Ok(TaskKey::HandOverAndArchive),
            "Task_SubmitApplication" => Ok(TaskKey::SubmitApplication),
            "Task_PresentApplicationsForAcceptance" => Ok(TaskKey::PresentForAcceptance),
            "Task_ReviewApplications" => Ok(TaskKey::ReviewApplications),
            "Task_PresentApplicationsToRKR" => Ok(TaskKey::PresentToRector),
            "Task_MakeDecision" => Ok(TaskKey::MakeDecision),
            "Task_ForwardApplicationsToMPD" => Ok(TaskKey::ForwardToMpd),
            "Task_HandleApplicationsExternal" => Ok(TaskKey::HandleExternal),
            "Task_ReceiveDecision" => Ok(TaskKey::ReceiveDecision),
            "Task_EnterToRegister" => Ok(TaskKey::EnterToRegister),
            other => Err(ParseKeyError::new("task", other)),
        }
    }
}
