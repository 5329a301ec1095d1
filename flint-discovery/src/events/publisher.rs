use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use flint_shared::clients::rabbitmq::RabbitMQClient;
use flint_shared::types::event::{payloads, routing_keys, Event};

/// Notification delivery is best-effort: a slow or dead broker must never
/// fail or roll back the swipe that triggered it.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn publish_super_liked(rabbitmq: &RabbitMQClient, from_user_id: Uuid, to_user_id: Uuid) {
    let event = Event::new(
        "flint-discovery",
        routing_keys::DISCOVERY_SUPER_LIKED,
        payloads::SuperLiked {
            from_user_id,
            to_user_id,
        },
    )
    .with_user(to_user_id);

    match timeout(
        PUBLISH_TIMEOUT,
        rabbitmq.publish(routing_keys::DISCOVERY_SUPER_LIKED, &event),
    )
    .await
    {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "failed to publish swipe.super_liked event"),
        Err(_) => tracing::error!("timed out publishing swipe.super_liked event"),
    }
}

/// One NEW_MATCH event per party.
pub async fn publish_match_created(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
) {
    for (user_id, matched_user_id) in [(user_a_id, user_b_id), (user_b_id, user_a_id)] {
        let event = Event::new(
            "flint-discovery",
            routing_keys::DISCOVERY_MATCH_CREATED,
            payloads::MatchCreated {
                match_id,
                user_id,
                matched_user_id,
            },
        )
        .with_user(user_id);

        match timeout(
            PUBLISH_TIMEOUT,
            rabbitmq.publish(routing_keys::DISCOVERY_MATCH_CREATED, &event),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "failed to publish match.created event"),
            Err(_) => tracing::error!("timed out publishing match.created event"),
        }
    }
}
