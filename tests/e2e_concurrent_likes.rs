mod common;

use std::thread;

use blog_api::storage::PostRepository;

#[test]
fn concurrent_likes_are_not_lost() {
    let (_dir, storage) = common::file_storage();
    let author = common::seed_user(&storage, "Ada");
    let post = storage.create_post("popular", "c", author).unwrap();

    let threads = 8;
    let likes_per_thread = 25;
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let storage = storage.clone();
            thread::spawn(move || {
                for _ in 0..likes_per_thread {
                    assert_eq!(storage.like_post(post).unwrap(), 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = storage.get_post_by_id(post).unwrap().unwrap();
    assert_eq!(stored.like_count, threads * likes_per_thread);
}
