//! The built-in process graphs.
//!
//! Three university administration processes ship with the catalog. Their
//! shapes are fixed; anything situational (who approves, which branch) is
//! expressed as instance variables read by the gateways below.

use caseflow_types::{Outcome, ProcessKey, Role, TaskKey};

use crate::{Branch, CatalogResult, ProcessDefinition, RoutingRule, TaskDefinition};

/// Every process definition this deployment knows, validated.
pub fn builtin_definitions() -> CatalogResult<Vec<ProcessDefinition>> {
    Ok(vec![leave_request()?, change_employment()?, decorations()?])
}

/// Leave request approval. The personnel department review branches on
/// whether the requester is academic staff: academic requests climb the
/// vice-rector chain to the Rector, non-academic ones go to the Chancellor.
/// Either decision returns to PD to inform the unit and register the leave.
fn leave_request() -> CatalogResult<ProcessDefinition> {
    use caseflow_types::TaskKey::*;

    let tasks = vec![
        TaskDefinition::new(
            ReviewAndForwardHeadOu,
            "Review and approve leave request",
            Role::HeadOfOrgUnit,
        ),
        TaskDefinition::new(
            ReviewApplicationPd,
            "Review leave request (check entitlement)",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            ReviewPrk,
            "Review application (PRK) and forward to PRN",
            Role::ViceRectorEducation,
        ),
        TaskDefinition::new(
            ReviewPrn,
            "Review application (PRN) and forward to Rector",
            Role::ViceRectorScience,
        ),
        TaskDefinition::new(
            MakeDecisionRkr,
            "Make decision (RKR) and return to PD",
            Role::Rector,
        ),
        TaskDefinition::new(
            MakeDecisionChancellor,
            "Make decision (KAN) and return to PD",
            Role::Chancellor,
        ),
        TaskDefinition::new(
            InformHeadOu,
            "Inform Head of O.U. about the decision",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            ImplementChanges,
            "Register leave in HR system",
            Role::PersonnelDepartment,
        ),
    ];

    let rules = vec![
        (ReviewAndForwardHeadOu, RoutingRule::Next(ReviewApplicationPd)),
        (
            ReviewApplicationPd,
            RoutingRule::BoolGateway {
                field: "is_academic",
                default: false,
                when_true: Branch::Task(ReviewPrk),
                when_false: Branch::Task(MakeDecisionChancellor),
            },
        ),
        (ReviewPrk, RoutingRule::Next(ReviewPrn)),
        (ReviewPrn, RoutingRule::Next(MakeDecisionRkr)),
        (MakeDecisionRkr, RoutingRule::Next(InformHeadOu)),
        (MakeDecisionChancellor, RoutingRule::Next(InformHeadOu)),
        (InformHeadOu, RoutingRule::Next(ImplementChanges)),
        (ImplementChanges, RoutingRule::Terminal(Outcome::Completed)),
    ];

    ProcessDefinition::new(
        ProcessKey::LeaveRequest,
        "Leave request",
        ReviewAndForwardHeadOu,
        tasks,
        rules,
    )
}

/// Change of employment conditions. Like leave requests, but the
/// quartermaster gives a financial opinion before the academic/non-academic
/// split, and implementation ends with a document hand-over and archive step.
fn change_employment() -> CatalogResult<ProcessDefinition> {
    use caseflow_types::TaskKey::*;

    let tasks = vec![
        TaskDefinition::new(
            ReviewAndForwardHeadOu,
            "Review and forward application to PD",
            Role::HeadOfOrgUnit,
        ),
        TaskDefinition::new(
            ReviewApplicationPd,
            "Review application (PD)",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            ReviewKwe,
            "Review application (Quartermaster)",
            Role::Quartermaster,
        ),
        TaskDefinition::new(
            ReviewPrk,
            "Review application (PRK) and forward to PRN",
            Role::ViceRectorEducation,
        ),
        TaskDefinition::new(
            ReviewPrn,
            "Review application (PRN) and forward to Rector",
            Role::ViceRectorScience,
        ),
        TaskDefinition::new(
            MakeDecisionRkr,
            "Make decision (RKR) and return to PD",
            Role::Rector,
        ),
        TaskDefinition::new(
            MakeDecisionChancellor,
            "Make decision (KAN) and return to PD",
            Role::Chancellor,
        ),
        TaskDefinition::new(
            ImplementAndPrepare,
            "Implement, Prepare, and Inform",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            HandOverAndArchive,
            "Hand Over Documents and Archive",
            Role::PersonnelDepartment,
        ),
    ];

    let rules = vec![
        (ReviewAndForwardHeadOu, RoutingRule::Next(ReviewApplicationPd)),
        (ReviewApplicationPd, RoutingRule::Next(ReviewKwe)),
        (
            ReviewKwe,
            RoutingRule::BoolGateway {
                field: "is_academic",
                default: false,
                when_true: Branch::Task(ReviewPrk),
                when_false: Branch::Task(MakeDecisionChancellor),
            },
        ),
        (ReviewPrk, RoutingRule::Next(ReviewPrn)),
        (ReviewPrn, RoutingRule::Next(MakeDecisionRkr)),
        (MakeDecisionRkr, RoutingRule::Next(ImplementAndPrepare)),
        (MakeDecisionChancellor, RoutingRule::Next(ImplementAndPrepare)),
        (ImplementAndPrepare, RoutingRule::Next(HandOverAndArchive)),
        (HandOverAndArchive, RoutingRule::Terminal(Outcome::Completed)),
    ];

    ProcessDefinition::new(
        ProcessKey::EmploymentChange,
        "Change of employment conditions",
        ReviewAndForwardHeadOu,
        tasks,
        rules,
    )
}

/// Decoration and medal nominations. The nomination form is captured when
/// the process starts, so the graph enters at the PD presentation step.
/// The Rector's decision is the one gateway: anything but an explicit
/// "Accepted" rejects the nomination outright.
fn decorations() -> CatalogResult<ProcessDefinition> {
    use caseflow_types::TaskKey::*;

    let tasks = vec![
        TaskDefinition::new(
            PresentForAcceptance,
            "Present applications for acceptance (PRK/Chancellor)",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            ReviewApplications,
            "Review applications and forward to PD",
            Role::ViceRectorEducation,
        ),
        TaskDefinition::new(
            PresentToRector,
            "Present reviewed applications to Rector",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(MakeDecision, "Make decision", Role::Rector),
        TaskDefinition::new(
            ForwardToMpd,
            "Forward accepted applications to MPD",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            HandleExternal,
            "Handle applications (external transfer)",
            Role::MilitaryPersonnelDepartment,
        ),
        TaskDefinition::new(
            ReceiveDecision,
            "Receive decision on award",
            Role::PersonnelDepartment,
        ),
        TaskDefinition::new(
            EnterToRegister,
            "Enter decoration into register",
            Role::PersonnelDepartment,
        ),
    ];

    let rules = vec![
        (PresentForAcceptance, RoutingRule::Next(ReviewApplications)),
        (ReviewApplications, RoutingRule::Next(PresentToRector)),
        (PresentToRector, RoutingRule::Next(MakeDecision)),
        (
            MakeDecision,
            RoutingRule::ChoiceGateway {
                field: "rkr_decision",
                accepted: "Accepted",
                on_accept: Branch::Task(ForwardToMpd),
                otherwise: Branch::Terminal(Outcome::Rejected),
            },
        ),
        (ForwardToMpd, RoutingRule::Next(HandleExternal)),
        (HandleExternal, RoutingRule::Next(ReceiveDecision)),
        (ReceiveDecision, RoutingRule::Next(EnterToRegister)),
        (EnterToRegister, RoutingRule::Terminal(Outcome::Completed)),
    ];

    ProcessDefinition::new(
        ProcessKey::Decorations,
        "Decorations and medals",
        PresentForAcceptance,
        tasks,
        rules,
    )
}
