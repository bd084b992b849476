//! Cross-organization isolation over the in-memory store.
//!
//! Every tool of the Acme toolset is pointed at Globex rows; none of them may
//! read, reveal or change anything outside Acme.

mod common;

use common::{ACME, GLOBEX, globex_ctx, seller_ctx, store, tools};
use dealdesk_domain::{CallingContext, ErrorCode, Table};
use serde_json::json;

#[tokio::test]
async fn test_search_contacts_does_not_leak_foreign_email() {
    let store = store();
    let acme = tools(&store, seller_ctx(1));

    for query in ["segredo@globex.example", "Globex", "+5521912345678"] {
        let result = acme.execute_json("searchContacts", json!({ "query": query })).await;
        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["count"], 0, "query {query} leaked");
    }

    let globex = tools(&store, globex_ctx());
    let own = globex
        .execute_json("searchContacts", json!({ "query": "segredo@globex.example" }))
        .await;
    assert_eq!(own.data().unwrap()["count"], 1);
}

#[tokio::test]
async fn test_foreign_deal_is_not_found() {
    let store = store();
    let acme = tools(&store, seller_ctx(1));

    for (tool, input) in [
        ("getDealDetails", json!({ "dealId": "deal-globex" })),
        ("listDealNotes", json!({ "dealId": "deal-globex" })),
        ("moveDeal", json!({ "dealId": "deal-globex", "stageName": "Proposta" })),
        ("updateDeal", json!({ "dealId": "deal-globex", "title": "Hijacked" })),
        ("markDealAsWon", json!({ "dealId": "deal-globex" })),
        ("markDealAsLost", json!({ "dealId": "deal-globex", "reason": "x" })),
        ("linkDealToContact", json!({ "dealId": "deal-globex", "contactId": "contact-s1" })),
        ("completeActivity", json!({ "activityId": "act-globex" })),
        ("getContactDetails", json!({ "contactId": "contact-globex" })),
        ("updateStage", json!({ "stageId": "board-globex-novo", "label": "Hijacked" })),
    ] {
        let result = acme.execute_json(tool, input).await;
        assert_eq!(
            result.error_code(),
            Some(ErrorCode::NotFoundOrForbidden),
            "{tool} reached a foreign row"
        );
    }

    let deal = store.find(Table::Deals, "deal-globex").unwrap();
    assert_eq!(deal["title"], "Globex Confidencial");
    assert_eq!(deal["stage_id"], "board-globex-novo");
    assert_eq!(deal["is_won"], false);
    let stage = store.find(Table::BoardStages, "board-globex-novo").unwrap();
    assert_eq!(stage["label"], "Novo");
}

#[tokio::test]
async fn test_add_deal_note_on_foreign_deal_fails() {
    let store = store();
    let acme = tools(&store, seller_ctx(1));
    let before = store.len(Table::DealNotes);

    let result = acme
        .execute_json("addDealNote", json!({ "dealId": "deal-globex", "content": "spy" }))
        .await;
    assert_eq!(result.error_code(), Some(ErrorCode::NotFoundOrForbidden));
    assert_eq!(store.len(Table::DealNotes), before);
}

#[tokio::test]
async fn test_bulk_move_with_foreign_board_or_deal_fails() {
    let store = store();
    let acme = tools(&store, seller_ctx(1));

    let foreign_board = acme
        .execute_json(
            "moveDealsBulk",
            json!({ "dealIds": ["deal-s1-open"], "boardId": "board-globex", "stageName": "Proposta" }),
        )
        .await;
    assert_eq!(foreign_board.error_code(), Some(ErrorCode::NotFoundOrForbidden));

    let foreign_deal = acme
        .execute_json(
            "moveDealsBulk",
            json!({ "dealIds": ["deal-s1-open", "deal-globex"], "stageName": "Proposta" }),
        )
        .await;
    assert_eq!(foreign_deal.error_code(), Some(ErrorCode::ValidationError));
    let failed = &foreign_deal.data().unwrap()["failed"];
    assert_eq!(failed[0]["dealId"], "deal-globex");

    assert_eq!(
        store.find(Table::Deals, "deal-s1-open").unwrap()["stage_id"],
        "board-s1-novo"
    );
    assert_eq!(
        store.find(Table::Deals, "deal-globex").unwrap()["stage_id"],
        "board-globex-novo"
    );
}

#[tokio::test]
async fn test_board_key_resolves_within_own_organization() {
    let store = store();
    let acme = tools(&store, CallingContext::new(ACME, "seller-1"));
    let globex = tools(&store, CallingContext::new(GLOBEX, "globex-1"));

    let (acme_stages, globex_stages) = tokio::join!(
        acme.execute_json("listStages", json!({ "boardId": "sales" })),
        globex.execute_json("listStages", json!({ "boardId": "SALES" })),
    );
    assert_eq!(acme_stages.data().unwrap()["board"]["id"], "board-sales");
    assert_eq!(globex_stages.data().unwrap()["board"]["id"], "board-globex");
}

#[tokio::test]
async fn test_foreign_user_cannot_become_owner() {
    let store = store();
    let acme = tools(&store, seller_ctx(1));

    let result = acme
        .execute_json("assignDeal", json!({ "dealId": "deal-s1-open", "newOwnerId": "globex-1" }))
        .await;
    assert_eq!(result.error_code(), Some(ErrorCode::ValidationError));
    assert_eq!(
        store.find(Table::Deals, "deal-s1-open").unwrap()["owner_id"],
        "seller-1"
    );
}

#[tokio::test]
async fn test_created_rows_belong_to_calling_organization() {
    let store = store();
    let globex = tools(&store, globex_ctx());

    let created = globex
        .execute_json(
            "createDeal",
            json!({ "title": "Globex Renewal", "contactName": "Cliente Novo Globex" }),
        )
        .await;
    assert!(created.is_success(), "{:?}", created);
    let deal_id = created.data().unwrap()["deal"]["id"].as_str().unwrap().to_string();
    let contact_id = created.data().unwrap()["contact"]["id"].as_str().unwrap().to_string();

    assert_eq!(store.find(Table::Deals, &deal_id).unwrap()["organization_id"], GLOBEX);
    assert_eq!(store.find(Table::Contacts, &contact_id).unwrap()["organization_id"], GLOBEX);

    let acme = tools(&store, seller_ctx(1));
    let search = acme.execute_json("searchDeals", json!({ "query": "Globex" })).await;
    assert_eq!(search.data().unwrap()["count"], 0);
}
