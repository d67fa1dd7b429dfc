//! Examples of using the copy-on-write trie
use cow_trie::{Error, Trie};

fn main() {
    // Create a new trie
    let trie = Trie::new();

    // Insert some values (each operation returns a new trie)
    let v1 = trie.put("hello", 1i32);
    let v2 = v1.put("world", 2i32);

    // Check values
    assert_eq!(v2.get::<i32>("hello"), Some(&1));
    assert_eq!(v2.get::<i32>("world"), Some(&2));
    assert_eq!(v2.get::<i32>("missing"), None);

    // Older versions keep their contents
    assert_eq!(v1.get::<i32>("world"), None);

    // Keys may hold values of different types
    let v3 = v2.put("greeting", String::from("aloha"));
    assert_eq!(v3.get::<String>("greeting").map(String::as_str), Some("aloha"));
    assert!(matches!(
        v3.try_get::<i32>("greeting"),
        Err(Error::TypeMismatch { .. })
    ));

    // Removing a key prunes the nodes only it was using
    let v4 = v3.remove("greeting");
    for key in v4.keys() {
        println!("{}", String::from_utf8_lossy(&key));
    }
    println!("{:?}", v4);
}
