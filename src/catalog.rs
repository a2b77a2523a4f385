//! Static demo catalog: events, agents and policies.
//!
//! The event catalog is an ordered list of synthetic enterprise events
//! covering the governed roles (finance, HR, sales, IoT, workflow). Pure
//! data; ids are injected at dispatch time so repeated entries in an
//! extended run stay distinct.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::EventDefinition;

/// Short uppercase document reference, e.g. `PO-3FA9C1`
fn doc_ref(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, hex[..6].to_uppercase())
}

/// Build the ordered demo event catalog.
///
/// Document numbers are freshly generated per call; the envelope shape
/// follows the SAP BTP CloudEvents the adapter expects.
pub fn demo_events() -> Vec<EventDefinition> {
    let today = Utc::now().date_naive().to_string();

    vec![
        EventDefinition::new(
            "Purchase order — Tata Components",
            "Finance",
            "S4H-PROD-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/s4hana-prod/purchaseorder",
                "type": "sap.s4.beh.purchaseorder.v1.PurchaseOrder.Created.v1",
                "sap_source_system": "S4H-PROD-001",
                "data": {
                    "PurchaseOrder": doc_ref("PO"),
                    "Supplier": "VENDOR-TATA-001",
                    "NetAmount": 45000,
                    "DocumentCurrency": "INR",
                    "CompanyCode": "1000",
                    "PurchasingGroup": "G01"
                }
            }),
        ),
        EventDefinition::new(
            "High-value purchase order — Infosys",
            "Finance",
            "S4H-PROD-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/s4hana-prod/purchaseorder",
                "type": "sap.s4.beh.purchaseorder.v1.PurchaseOrder.Created.v1",
                "sap_source_system": "S4H-PROD-001",
                "data": {
                    "PurchaseOrder": doc_ref("PO"),
                    "Supplier": "VENDOR-INFOSYS-003",
                    "NetAmount": 850000,
                    "DocumentCurrency": "INR",
                    "CompanyCode": "1000",
                    "PurchasingGroup": "G01"
                }
            }),
        ),
        EventDefinition::new(
            "Employee onboarding — Engineering",
            "HR",
            "SF-PROD-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/successfactors/employee",
                "type": "sap.s4.beh.employee.v1.Employee.Onboarded.v1",
                "sap_source_system": "SF-PROD-001",
                "data": {
                    "EmployeeId": doc_ref("EMP"),
                    "FirstName": "Ravi",
                    "LastName": "Shankar",
                    "Department": "Engineering",
                    "StartDate": today.clone()
                }
            }),
        ),
        EventDefinition::new(
            "Sales order — Wipro",
            "Sales",
            "S4H-PROD-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/s4hana-prod/salesorder",
                "type": "sap.s4.beh.salesorder.v1.SalesOrder.Created.v1",
                "sap_source_system": "S4H-PROD-001",
                "data": {
                    "SalesOrder": doc_ref("SO"),
                    "SoldToParty": "CUSTOMER-WIPRO-007",
                    "TotalNetAmount": 12000,
                    "TransactionCurrency": "INR",
                    "SalesOrganization": "1000"
                }
            }),
        ),
        EventDefinition::new(
            "IoT threshold breach — edge cluster A",
            "IoT",
            "EDGE-CLUSTER-A",
            json!({
                "specversion": "1.0",
                "source": "/sap/btp/alert-notification/iot-sensor-cluster-a",
                "type": "com.sap.alert.notification.v1.AlertNotification.Triggered.v1",
                "sap_source_system": "EDGE-CLUSTER-A",
                "data": {
                    "alertType": "THRESHOLD_BREACH",
                    "resourceName": "EDGE-SENSOR-47",
                    "region": "ap-south-1",
                    "thresholdValue": 92.7,
                    "unit": "celsius",
                    "severity": "HIGH",
                    "message": "Temperature exceeds critical threshold"
                }
            }),
        ),
        EventDefinition::new(
            "CapEx approval workflow",
            "Workflow",
            "BTP-INTEGRATION-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/btp/workflow/process-integration",
                "type": "com.sap.btp.workflow.v1.WorkflowInstance.Started.v1",
                "sap_source_system": "BTP-INTEGRATION-001",
                "data": {
                    "workflowInstanceId": Uuid::new_v4().to_string(),
                    "workflowDefinitionId": "CapEx-Approval-v2",
                    "status": "started",
                    "initiatedBy": "priya.nair@enterprise.com"
                }
            }),
        ),
        EventDefinition::new(
            "Payment advice — Tata Components",
            "Finance",
            "S4H-PROD-001",
            json!({
                "specversion": "1.0",
                "source": "/sap/s4hana-prod/paymentadvice",
                "type": "sap.s4.beh.paymentAdvice.v1.PaymentAdvice.Posted.v1",
                "sap_source_system": "S4H-PROD-001",
                "data": {
                    "PaymentAdvice": doc_ref("PA"),
                    "Payee": "VENDOR-TATA-001",
                    "Amount": 45000,
                    "Currency": "INR",
                    "PostingDate": today
                }
            }),
        ),
    ]
}

/// Demo agent records for best-effort registry seeding
pub fn demo_agents() -> Vec<Value> {
    vec![
        json!({
            "agent_code": "FI-ANALYST-DEMO",
            "display_name": "Finance Analyst Agent",
            "role": "fi_analyst",
            "crewai_role": "Senior Financial Analyst responsible for procurement and payment approvals",
            "crewai_backstory": "I analyze financial transactions and enforce spending policies across the enterprise. I have access to SAP S/4HANA Finance module and comply with SOX and internal audit requirements.",
            "tier": "T2",
            "dna_profile": {"specialization": "finance", "risk_tolerance": "medium"},
            "platform_bindings": ["SAP_S4HANA", "SAP_BTP", "CLOUD_AWS"]
        }),
        json!({
            "agent_code": "HR-BOT-DEMO",
            "display_name": "HR Process Bot",
            "role": "hr_bot",
            "crewai_role": "Human Resources Automation Agent handling employee lifecycle events",
            "crewai_backstory": "I manage employee onboarding, access provisioning, and termination workflows. I handle sensitive PII and strictly follow GDPR and internal data governance policies.",
            "tier": "T3",
            "dna_profile": {"specialization": "hr", "risk_tolerance": "low"},
            "platform_bindings": ["SAP_SUCCESSFACTORS", "SAP_BTP"]
        }),
        json!({
            "agent_code": "SALES-REP-DEMO",
            "display_name": "Sales Automation Agent",
            "role": "sales_rep",
            "crewai_role": "Sales Process Automation Agent managing order approvals and discount issuance",
            "crewai_backstory": "I handle sales order creation and discount approval workflows in SAP S/4HANA Sales module. I enforce pricing policies and margin protection rules.",
            "tier": "T3",
            "dna_profile": {"specialization": "sales", "risk_tolerance": "medium"},
            "platform_bindings": ["SAP_S4HANA_SALES", "SAP_BTP"]
        }),
        json!({
            "agent_code": "EDGE-SENSOR-DEMO",
            "display_name": "Edge IoT Sensor Agent",
            "role": "edge_sensor",
            "crewai_role": "Edge Gateway IoT monitoring and threshold alert agent",
            "crewai_backstory": "I monitor IoT sensors at edge locations, detect threshold breaches, and trigger alert notifications through SAP BTP Alert Notification Service.",
            "tier": "T4",
            "dna_profile": {"specialization": "iot", "risk_tolerance": "high"},
            "platform_bindings": ["SAP_BTP_ALERT", "EDGE_IOT"]
        }),
        json!({
            "agent_code": "BTP-AGENT-DEMO",
            "display_name": "BTP Workflow Orchestrator",
            "role": "btp_agent",
            "crewai_role": "SAP BTP Workflow Service integration agent",
            "crewai_backstory": "I orchestrate complex multi-step workflows in SAP BTP. I coordinate approvals and delegate tasks across the enterprise.",
            "tier": "T2",
            "dna_profile": {"specialization": "workflow", "risk_tolerance": "low"},
            "platform_bindings": ["SAP_BTP_WORKFLOW", "SAP_BTP"]
        }),
    ]
}

/// Demo policy records for best-effort registry seeding
pub fn demo_policies() -> Vec<Value> {
    vec![
        json!({
            "policy_code": "POL-FI-AMOUNT-LIMIT-001",
            "policy_name": "Finance Agent Purchase Order Limit",
            "category": "authority",
            "description": "Finance agents cannot approve purchase orders above ₹1,00,000 without human escalation.",
            "rule_definition": {"type": "amount_limit", "max_amount": 100000},
            "applies_to_roles": ["fi_analyst"],
            "applies_to_tiers": ["*"],
            "severity": "high",
            "action_on_violation": "escalate"
        }),
        json!({
            "policy_code": "POL-GLOBAL-TRUST-MIN-001",
            "policy_name": "Minimum Trust Score for Autonomous Action",
            "category": "trust",
            "description": "All agents must have a trust score of at least 0.40 to execute actions autonomously.",
            "rule_definition": {"type": "trust_minimum", "min_trust": 0.40},
            "applies_to_roles": ["*"],
            "applies_to_tiers": ["*"],
            "severity": "critical",
            "action_on_violation": "block"
        }),
        json!({
            "policy_code": "POL-HR-ACCESS-CONTROL-001",
            "policy_name": "HR PII Access Control",
            "category": "data_governance",
            "description": "HR agents are permitted to access PII only during active business hours.",
            "rule_definition": {"type": "status_check", "required_status": "active"},
            "applies_to_roles": ["hr_bot"],
            "applies_to_tiers": ["*"],
            "severity": "critical",
            "action_on_violation": "block"
        }),
        json!({
            "policy_code": "POL-SALES-DISCOUNT-LIMIT-001",
            "policy_name": "Sales Discount Authority Limit",
            "category": "authority",
            "description": "Sales agents cannot issue discounts on orders above ₹50,000.",
            "rule_definition": {"type": "amount_limit", "max_amount": 50000},
            "applies_to_roles": ["sales_rep"],
            "applies_to_tiers": ["*"],
            "severity": "medium",
            "action_on_violation": "escalate"
        }),
        json!({
            "policy_code": "POL-EDGE-TIER-REQUIRE-001",
            "policy_name": "Edge Tier Access Restriction",
            "category": "environment",
            "description": "Only T4 agents are permitted to operate on bare edge environments.",
            "rule_definition": {"type": "tier_required", "allowed_tiers": ["T4", "T3"]},
            "applies_to_roles": ["edge_sensor"],
            "applies_to_tiers": ["T4", "T3"],
            "severity": "medium",
            "action_on_violation": "block"
        }),
    ]
}
