mod common;

use ruqanda::comment::{self, CommentNode, NewCommentData, COMMENTS_PER_PAGE, MAX_REPLY_DEPTH};
use ruqanda::error::ForumError;
use ruqanda::orm::comments;
use ruqanda::score::UPVOTE;
use ruqanda::target::{Target, TargetKind};
use ruqanda::vote;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

fn comment(content: &str) -> NewCommentData {
    NewCommentData {
        content: content.to_owned(),
        parent_id: None,
    }
}

fn reply(content: &str, parent_id: i32) -> NewCommentData {
    NewCommentData {
        content: content.to_owned(),
        parent_id: Some(parent_id),
    }
}

async fn comment_rows(db: &DatabaseConnection) -> u64 {
    comments::Entity::find().count(db).await.unwrap()
}

/// Longest root-to-leaf chain in a forest, in nodes.
fn forest_depth(nodes: &[CommentNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + forest_depth(&node.children))
        .max()
        .unwrap_or(0)
}

#[actix_rt::test]
async fn test_empty_content_is_rejected() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let parent = comment::create_comment(&db, 1, host, comment("First!"))
        .await
        .unwrap();
    assert_eq!(comment_rows(&db).await, 1);

    for data in [comment("   "), reply("", parent.id)] {
        match comment::create_comment(&db, 1, host, data).await {
            Err(ForumError::Validation(_)) => {}
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
    assert_eq!(comment_rows(&db).await, 1);
}

#[actix_rt::test]
async fn test_reply_targets_its_parent() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let parent = comment::create_comment(&db, 1, host, comment("Top-level comment"))
        .await
        .unwrap();
    assert_eq!(parent.target_kind, TargetKind::Answer);
    assert_eq!(parent.target_id, answer.id);
    assert_eq!(parent.parent_id, None);

    let child = comment::create_comment(&db, 2, host, reply("A reply", parent.id))
        .await
        .unwrap();
    assert_eq!(child.target_kind, TargetKind::Comment);
    assert_eq!(child.target_id, parent.id);
    assert_eq!(child.parent_id, Some(parent.id));
}

#[actix_rt::test]
async fn test_reply_to_missing_parent_is_not_found() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;

    match comment::create_comment(&db, 1, Target::answer(answer.id), reply("hello?", 999)).await {
        Err(ForumError::NotFound(kind)) => assert_eq!(kind, TargetKind::Comment),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[actix_rt::test]
async fn test_three_level_reply_chain() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let top = comment::create_comment(&db, 1, host, comment("Top-level comment"))
        .await
        .unwrap();
    let r1 = comment::create_comment(&db, 1, host, reply("Reply level 1", top.id))
        .await
        .unwrap();
    let r2 = comment::create_comment(&db, 1, host, reply("Reply level 2", r1.id))
        .await
        .unwrap();
    let r3 = comment::create_comment(&db, 1, host, reply("Reply level 3", r2.id))
        .await
        .unwrap();

    for id in [top.id, r1.id, r2.id, r3.id] {
        vote::cast(&db, 1, Target::comment(id), UPVOTE).await.unwrap();
    }

    let forest = comment::comment_forest(&db, host, Some(1)).await.unwrap();
    assert_eq!(forest.len(), 1, "expected one top-level comment");

    let top_node = &forest[0];
    assert_eq!(top_node.upvotes, 1);
    assert_eq!(top_node.user_vote, 1);

    let level1 = &top_node.children[0];
    let level2 = &level1.children[0];
    let level3 = &level2.children[0];
    assert_eq!(level3.comment.content, "Reply level 3");
    assert!(level3.children.is_empty());
    for node in [level1, level2, level3] {
        assert_eq!(node.upvotes, 1);
        assert_eq!(node.user_vote, 1);
    }
}

#[actix_rt::test]
async fn test_forest_orders_newest_first_at_every_level() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let top = comment::create_comment(&db, 1, host, comment("older top"))
        .await
        .unwrap();
    let old_reply = comment::create_comment(&db, 1, host, reply("older reply", top.id))
        .await
        .unwrap();
    let new_reply = comment::create_comment(&db, 1, host, reply("newer reply", top.id))
        .await
        .unwrap();
    let newer_top = comment::create_comment(&db, 1, host, comment("newer top"))
        .await
        .unwrap();

    let forest = comment::comment_forest(&db, host, None).await.unwrap();
    assert_eq!(forest[0].comment.id, newer_top.id);
    assert_eq!(forest[1].comment.id, top.id);
    assert_eq!(forest[1].children[0].comment.id, new_reply.id);
    assert_eq!(forest[1].children[1].comment.id, old_reply.id);
}

#[actix_rt::test]
async fn test_pagination_applies_only_to_top_level() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    // One commented thread plus enough top-level comments for two pages.
    let top = comment::create_comment(&db, 1, host, comment("discussed comment"))
        .await
        .unwrap();
    let r1 = comment::create_comment(&db, 2, host, reply("first reply", top.id))
        .await
        .unwrap();
    comment::create_comment(&db, 3, host, reply("nested reply", r1.id))
        .await
        .unwrap();
    for i in 0..4 {
        comment::create_comment(&db, 1, host, comment(&format!("extra comment {}", i)))
            .await
            .unwrap();
    }

    let page1 = comment::comment_page(&db, host, None, Some(1)).await.unwrap();
    assert_eq!(page1.items.len(), COMMENTS_PER_PAGE as usize);
    assert_eq!(page1.total_pages, 2);
    assert!(page1.has_other_pages);

    let page2 = comment::comment_page(&db, host, None, Some(2)).await.unwrap();
    assert_eq!(page2.items.len(), 2);
    assert!(page2.has_other_pages);

    // The discussed comment is the oldest top-level row, so it lands on
    // page 2 with its subtree complete.
    let discussed = page2
        .items
        .iter()
        .find(|node| node.comment.id == top.id)
        .expect("discussed comment missing from page 2");
    assert_eq!(discussed.children.len(), 1);
    assert_eq!(discussed.children[0].children.len(), 1);
}

#[actix_rt::test]
async fn test_page_overflow_clamps_to_last_page() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    for i in 0..5 {
        comment::create_comment(&db, 1, host, comment(&format!("comment {}", i)))
            .await
            .unwrap();
    }

    let page = comment::comment_page(&db, host, None, Some(99)).await.unwrap();
    assert_eq!(page.page_number, 2);
    assert_eq!(page.items.len(), 2);
}

#[actix_rt::test]
async fn test_empty_forest_and_missing_host() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;

    let page = comment::comment_page(&db, Target::answer(answer.id), None, None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_other_pages);

    match comment::comment_page(&db, Target::answer(999), None, None).await {
        Err(ForumError::NotFound(kind)) => assert_eq!(kind, TargetKind::Answer),
        other => panic!("expected not found, got {:?}", other.map(|p| p.page_number)),
    }
}

#[actix_rt::test]
async fn test_reply_depth_is_capped() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let mut parent = comment::create_comment(&db, 1, host, comment("root"))
        .await
        .unwrap();
    for i in 0..MAX_REPLY_DEPTH + 2 {
        parent = comment::create_comment(&db, 1, host, reply(&format!("level {}", i), parent.id))
            .await
            .unwrap();
    }

    // The root plus at most MAX_REPLY_DEPTH loaded reply levels.
    let forest = comment::comment_forest(&db, host, None).await.unwrap();
    assert_eq!(forest_depth(&forest), MAX_REPLY_DEPTH + 1);
}

#[actix_rt::test]
async fn test_only_the_author_may_edit_or_delete() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let target = comment::create_comment(&db, 1, host, comment("Original Comment"))
        .await
        .unwrap();

    match comment::update_comment(&db, 2, target.id, "hijacked".to_owned()).await {
        Err(ForumError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {:?}", other),
    }
    match comment::delete_comment(&db, 2, target.id).await {
        Err(ForumError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {:?}", other),
    }

    let updated = comment::update_comment(&db, 1, target.id, "Updated Comment".to_owned())
        .await
        .unwrap();
    assert_eq!(updated.content, "Updated Comment");
}

#[actix_rt::test]
async fn test_delete_removes_the_reply_subtree() {
    let db = common::connect().await;
    let (_, answer) = common::seed_answer(&db, 1).await;
    let host = Target::answer(answer.id);

    let doomed = comment::create_comment(&db, 1, host, comment("doomed"))
        .await
        .unwrap();
    let child = comment::create_comment(&db, 2, host, reply("child", doomed.id))
        .await
        .unwrap();
    comment::create_comment(&db, 3, host, reply("grandchild", child.id))
        .await
        .unwrap();
    let survivor = comment::create_comment(&db, 1, host, comment("survivor"))
        .await
        .unwrap();

    comment::delete_comment(&db, 1, doomed.id).await.unwrap();

    assert_eq!(comment_rows(&db).await, 1);
    let forest = comment::comment_forest(&db, host, None).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].comment.id, survivor.id);
}
