use proptest::prelude::*;
use tokio_test::block_on;

use crate::repo::tests::setup_test_repo;

proptest! {
    /// Saving any session promotes it to the front of the chat list
    #[test]
    fn prop_saved_chat_moves_to_front(count in 2usize..6, pick in any::<prop::sample::Index>()) {
        block_on(async {
            let repo = setup_test_repo().await;

            for _ in 0..count {
                repo.create_chat().await.unwrap();
            }

            let chats = repo.get_chats();
            let target = chats[pick.index(chats.len())].clone();

            let saved = repo.save_chat(target.clone()).await.unwrap();

            let after = repo.get_chats();
            assert_eq!(after.len(), count);
            assert_eq!(after[0].get_id(), target.get_id());
            assert!(saved.get_updated_at() >= target.get_updated_at());
        });
    }
}
