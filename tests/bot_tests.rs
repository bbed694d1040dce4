use exchange_bot::bot::create_currency_keyboard;
use exchange_bot::bot::message_handler::apply_state;
use exchange_bot::dialogue::{ConversationState, ConvertDialogue, CurrencyPair};
use exchange_bot::localization::init_localization;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::{ChatId, InlineKeyboardButtonKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() {
        // Initialize localization if not already done
        let _ = init_localization();
    }

    fn dialogue_for(chat: i64) -> (std::sync::Arc<InMemStorage<ConversationState>>, ConvertDialogue) {
        let storage = InMemStorage::<ConversationState>::new();
        let dialogue = ConvertDialogue::new(storage.clone(), ChatId(chat));
        (storage, dialogue)
    }

    /// Test that a new session starts in the default state
    #[tokio::test]
    async fn test_new_session_is_empty() {
        let (_storage, dialogue) = dialogue_for(1);
        assert_eq!(dialogue.get().await.unwrap(), None);
        assert_eq!(
            dialogue.get_or_default().await.unwrap(),
            ConversationState::Idle
        );
    }

    /// Test storing and clearing a session
    #[tokio::test]
    async fn test_apply_state_stores_and_clears() {
        let (_storage, dialogue) = dialogue_for(2);
        let awaiting = ConversationState::AwaitingAmount {
            pair: CurrencyPair::UsdRub.query().to_string(),
        };

        apply_state(&dialogue, awaiting.clone()).await.unwrap();
        assert_eq!(dialogue.get().await.unwrap(), Some(awaiting));

        apply_state(&dialogue, ConversationState::Idle).await.unwrap();
        assert_eq!(dialogue.get().await.unwrap(), None);
    }

    /// Test that sessions never leak between chats
    #[tokio::test]
    async fn test_sessions_are_per_chat() {
        let (storage, first) = dialogue_for(10);
        let second = ConvertDialogue::new(storage, ChatId(11));

        apply_state(&first, ConversationState::AwaitingCustomCurrency)
            .await
            .unwrap();

        assert_eq!(
            first.get().await.unwrap(),
            Some(ConversationState::AwaitingCustomCurrency)
        );
        assert_eq!(second.get().await.unwrap(), None);
    }

    /// Test the currency keyboard layout
    #[test]
    fn test_currency_keyboard_layout() {
        setup_localization();
        let keyboard = create_currency_keyboard(Some("en"));

        let rows: Vec<Vec<(String, String)>> = keyboard
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| {
                        let data = match &button.kind {
                            InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                            other => panic!("unexpected button kind {other:?}"),
                        };
                        (button.text.clone(), data)
                    })
                    .collect()
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                vec![
                    ("USD/RUB".to_string(), "USD_RUB".to_string()),
                    ("EUR/RUB".to_string(), "EUR_RUB".to_string()),
                ],
                vec![("Own currency".to_string(), "CUSTOM".to_string())],
            ]
        );
    }

    /// Test the Russian keyboard labels keep the same tags
    #[test]
    fn test_currency_keyboard_russian_labels() {
        setup_localization();
        let keyboard = create_currency_keyboard(Some("ru"));
        let custom = &keyboard.inline_keyboard[1][0];
        assert_eq!(custom.text, "Своя валюта");
        assert!(matches!(
            &custom.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "CUSTOM"
        ));
    }

    /// Test that dialogue states can be serialized/deserialized with serde_json
    #[test]
    fn test_dialogue_state_serialization() {
        let state = ConversationState::AwaitingAmount {
            pair: "EUR to RUB".to_string(),
        };
        let json = serde_json::to_string(&state).unwrap();
        let restored: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
