//! Contact tools.

use std::collections::HashSet;

use dealdesk_domain::core::string::non_blank;
use dealdesk_domain::crm::email::{is_plausible_email, normalize_email};
use dealdesk_domain::crm::phone::{is_e164, normalize_phone_e164};
use dealdesk_domain::{Company, Contact, Deal, Table, ToolError};
use serde_json::{Map, Value, json};
use tracing::info;

use super::args::{
    ContactInput, CreateContactInput, LinkDealToContactInput, SearchInput, UpdateContactInput,
};
use super::gateway::row;
use super::scope::TenantScope;
use crate::ports::entity_store::{Filter, Query};

fn checked_email(raw: &str) -> Result<String, ToolError> {
    if !is_plausible_email(raw) {
        return Err(ToolError::validation(format!(
            "'{}' is not a valid email address",
            raw.trim()
        )));
    }
    Ok(normalize_email(raw))
}

impl TenantScope {
    /// Reject an email already used by another contact of the organization.
    async fn ensure_email_free(&self, email: &str, except_id: Option<&str>) -> Result<(), ToolError> {
        let holders: Vec<Contact> = self
            .owned_where(Query::from(Table::Contacts).filter(Filter::ilike("email", email)))
            .await?;
        let taken = holders.iter().any(|c| {
            Some(c.id.as_str()) != except_id
                && c.email.as_deref().map(normalize_email).as_deref() == Some(email)
        });
        if taken {
            return Err(ToolError::validation(format!(
                "A contact with email '{}' already exists",
                email
            )));
        }
        Ok(())
    }

    fn phone_value(&self, raw: &str) -> Option<String> {
        let phone = normalize_phone_e164(raw, &self.config.default_country_code);
        (!phone.is_empty()).then_some(phone)
    }

    /// E.164 form of a phone given as tool input; anything else is rejected.
    fn checked_phone(&self, raw: &str) -> Result<String, ToolError> {
        let phone = normalize_phone_e164(raw, &self.config.default_country_code);
        if !is_e164(&phone) {
            return Err(ToolError::validation(format!(
                "'{}' is not a valid phone number",
                raw.trim()
            )));
        }
        Ok(phone)
    }
}

pub(crate) async fn create_contact(scope: &TenantScope, input: CreateContactInput) -> Result<Value, ToolError> {
    let name = non_blank(Some(&input.name))
        .ok_or_else(|| ToolError::validation("name must not be empty"))?;
    let email = non_blank(input.email.as_deref())
        .map(|e| checked_email(&e))
        .transpose()?;
    if let Some(email) = email.as_deref() {
        scope.ensure_email_free(email, None).await?;
    }
    let phone = non_blank(input.phone.as_deref())
        .map(|p| scope.checked_phone(&p))
        .transpose()?;
    let company = match non_blank(input.company_name.as_deref()) {
        Some(company) => Some(scope.find_or_create_company(&company).await?),
        None => None,
    };

    let now = scope.now_value();
    let contact: Contact = scope
        .store
        .insert(
            Table::Contacts,
            row(json!({
                "organization_id": scope.org(),
                "name": name,
                "email": email,
                "phone": phone,
                "company_id": company.as_ref().map(|c| c.id.clone()),
                "notes": non_blank(input.notes.as_deref()),
                "owner_id": scope.ctx.owner_id,
                "created_at": now,
                "updated_at": now,
            })),
        )
        .await?;
    info!(tool = "createContact", org = %scope.org(), contact = %contact.id, "Contact created");

    Ok(json!({
        "contact": contact.summary(),
        "company": company.map(|c| c.name),
    }))
}

pub(crate) async fn update_contact(scope: &TenantScope, input: UpdateContactInput) -> Result<Value, ToolError> {
    let contact: Contact = scope.assert_owned(&input.contact_id).await?;

    let mut patch = Map::new();
    if let Some(name) = input.name.as_deref() {
        let name = non_blank(Some(name)).ok_or_else(|| ToolError::validation("name must not be empty"))?;
        patch.insert("name".into(), json!(name));
    }
    if let Some(email) = non_blank(input.email.as_deref()) {
        let email = checked_email(&email)?;
        scope.ensure_email_free(&email, Some(&contact.id)).await?;
        patch.insert("email".into(), json!(email));
    }
    if let Some(phone) = input.phone.as_deref() {
        let phone = non_blank(Some(phone)).ok_or_else(|| ToolError::validation("phone must not be empty"))?;
        patch.insert("phone".into(), json!(scope.checked_phone(&phone)?));
    }
    if let Some(company) = non_blank(input.company_name.as_deref()) {
        let company = scope.find_or_create_company(&company).await?;
        patch.insert("company_id".into(), json!(company.id));
    }
    if let Some(notes) = input.notes.as_deref() {
        patch.insert("notes".into(), json!(notes.trim()));
    }
    if patch.is_empty() {
        return Err(ToolError::validation(
            "Nothing to update: pass name, email, phone, companyName or notes",
        ));
    }
    let changed: Vec<String> = patch.keys().cloned().collect();
    patch.insert("updated_at".into(), scope.now_value());

    let updated: Contact = scope
        .store
        .update_one(Table::Contacts, scope.org(), &contact.id, patch)
        .await?;
    info!(tool = "updateContact", org = %scope.org(), contact = %updated.id, "Contact updated");

    Ok(json!({ "contact": updated.summary(), "updatedFields": changed }))
}

/// Contact looked up by id, email or phone, with its company and deals.
pub(crate) async fn get_contact_details(scope: &TenantScope, input: ContactInput) -> Result<Value, ToolError> {
    let contact = scope.resolve_contact(&input.contact_id).await?;
    let company: Option<Company> = scope.find_owned(contact.company_id.as_deref()).await?;
    let deals: Vec<Deal> = scope
        .owned_where(
            Query::from(Table::Deals)
                .eq("contact_id", contact.id.as_str())
                .order_by("created_at", false),
        )
        .await?;

    let mut summary = contact.summary();
    if let Value::Object(map) = &mut summary {
        map.insert("notes".into(), json!(contact.notes));
        map.insert("companyName".into(), json!(company.map(|c| c.name)));
    }

    Ok(json!({
        "contact": summary,
        "deals": deals.iter().map(Deal::summary).collect::<Vec<_>>(),
    }))
}

pub(crate) async fn search_contacts(scope: &TenantScope, input: SearchInput) -> Result<Value, ToolError> {
    let needle = non_blank(Some(&input.query))
        .ok_or_else(|| ToolError::validation("query must not be empty"))?;
    let limit = scope.config.list_limit(input.limit);
    let by_created = |q: Query| q.order_by("created_at", true);

    let mut found: Vec<Contact> = scope
        .owned_where(by_created(
            Query::from(Table::Contacts).filter(Filter::ilike("name", needle.as_str())),
        ))
        .await?;
    found.extend(
        scope
            .owned_where::<Contact>(by_created(
                Query::from(Table::Contacts).filter(Filter::ilike("email", needle.as_str())),
            ))
            .await?,
    );
    if let Some(phone) = scope.phone_value(&needle).filter(|p| p.starts_with('+')) {
        found.extend(
            scope
                .owned_where::<Contact>(by_created(Query::from(Table::Contacts).eq("phone", phone)))
                .await?,
        );
    }

    let mut seen = HashSet::new();
    let contacts: Vec<Value> = found
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .take(limit)
        .map(|c| c.summary())
        .collect();

    Ok(json!({ "count": contacts.len(), "contacts": contacts }))
}

pub(crate) async fn link_deal_to_contact(
    scope: &TenantScope,
    input: LinkDealToContactInput,
) -> Result<Value, ToolError> {
    let deal_id = scope.deal_id_or_context(input.deal_id.as_deref())?;
    let deal = scope.resolve_deal(&deal_id, None).await?;
    let contact: Contact = scope.assert_owned(&input.contact_id).await?;

    let linked: Deal = scope
        .store
        .update_one(
            Table::Deals,
            scope.org(),
            &deal.id,
            row(json!({ "contact_id": contact.id, "updated_at": scope.now_value() })),
        )
        .await?;
    info!(tool = "linkDealToContact", org = %scope.org(), deal = %linked.id, contact = %contact.id, "Deal linked to contact");

    Ok(json!({
        "deal": linked.summary(),
        "contact": contact.summary(),
        "previousContactId": deal.contact_id,
    }))
}
