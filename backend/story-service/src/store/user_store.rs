use crate::models::User;
use dashmap::DashMap;

/// Outcome of an atomic token debit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDebit {
    /// Debit applied; carries the remaining balance
    Debited(i64),
    /// Balance below the requested amount; carries the current balance
    Insufficient(i64),
    /// No such user
    UnknownUser,
}

/// User records keyed by id (phone number)
#[derive(Default)]
pub struct UserStore {
    users: DashMap<String, User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    pub fn upsert(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn get(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|entry| entry.value().clone())
    }

    pub fn username_of(&self, user_id: &str) -> Option<String> {
        self.users
            .get(user_id)
            .map(|entry| entry.value().username.clone())
    }

    /// Check-and-debit under the entry lock so a balance never goes negative
    pub fn debit_tokens(&self, user_id: &str, amount: i64) -> TokenDebit {
        match self.users.get_mut(user_id) {
            Some(mut entry) => {
                if entry.token_balance < amount {
                    TokenDebit::Insufficient(entry.token_balance)
                } else {
                    entry.token_balance -= amount;
                    TokenDebit::Debited(entry.token_balance)
                }
            }
            None => TokenDebit::UnknownUser,
        }
    }

    pub fn credit_tokens(&self, user_id: &str, amount: i64) -> bool {
        match self.users.get_mut(user_id) {
            Some(mut entry) => {
                entry.token_balance += amount;
                true
            }
            None => false,
        }
    }

    /// Mark a user as DigiLocker-verified, creating the record if needed
    pub fn mark_verified(&self, user_id: &str) {
        match self.users.get_mut(user_id) {
            Some(mut entry) => entry.digilocker_verified = true,
            None => {
                self.users.insert(
                    user_id.to_string(),
                    User {
                        id: user_id.to_string(),
                        username: user_id.to_string(),
                        token_balance: 0,
                        digilocker_verified: true,
                    },
                );
            }
        }
    }

    /// Seed the demo accounts used in development
    pub fn seed_demo_users(&self) {
        self.upsert(User {
            id: "1234567890".to_string(),
            username: "Demo User".to_string(),
            token_balance: 1_000,
            digilocker_verified: true,
        });
        self.upsert(User {
            id: "9876543210".to_string(),
            username: "Test User".to_string(),
            token_balance: 100,
            digilocker_verified: false,
        });
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, balance: i64) -> User {
        User {
            id: id.to_string(),
            username: "someone".to_string(),
            token_balance: balance,
            digilocker_verified: false,
        }
    }

    #[test]
    fn debit_respects_balance_floor() {
        let store = UserStore::new();
        store.upsert(user("u1", 400));

        assert_eq!(store.debit_tokens("u1", 350), TokenDebit::Debited(50));
        assert_eq!(store.debit_tokens("u1", 350), TokenDebit::Insufficient(50));
        assert_eq!(store.get("u1").unwrap().token_balance, 50);
        assert_eq!(store.debit_tokens("missing", 350), TokenDebit::UnknownUser);
    }

    #[test]
    fn mark_verified_creates_missing_users() {
        let store = UserStore::new();
        store.mark_verified("u2");
        let created = store.get("u2").unwrap();
        assert!(created.digilocker_verified);
        assert_eq!(created.token_balance, 0);

        store.upsert(user("u3", 10));
        store.mark_verified("u3");
        let existing = store.get("u3").unwrap();
        assert!(existing.digilocker_verified);
        assert_eq!(existing.token_balance, 10);
    }

    #[test]
    fn concurrent_debits_never_overspend() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(UserStore::new());
        store.upsert(user("u4", 1_000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    let mut granted = 0;
                    for _ in 0..10 {
                        if let TokenDebit::Debited(_) = store.debit_tokens("u4", 350) {
                            granted += 1;
                        }
                    }
                    granted
                })
            })
            .collect();

        let total: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        // 1000 tokens only ever cover two 350-token debits
        assert_eq!(total, 2);
        assert_eq!(store.get("u4").unwrap().token_balance, 300);
    }
}
