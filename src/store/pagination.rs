use crate::common::Message;

/// Tail window over a chatroom projection: the last `page_size * page`
/// entries, where `page` starts at 1 and grows by one per "load more".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    page: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn window_len(&self) -> usize {
        self.page_size.saturating_mul(self.page)
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// The visible tail of `projected`.
    pub fn visible<'a>(&self, projected: &'a [Message]) -> &'a [Message] {
        let start = projected.len().saturating_sub(self.window_len());
        &projected[start..]
    }

    pub fn has_more(&self, projected: &[Message]) -> bool {
        projected.len() > self.window_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Sender;

    fn messages(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| Message {
                id: i.to_string(),
                chatroom_id: "a".into(),
                sender: Sender::User,
                content: String::new(),
                timestamp: i as i64,
                image: None,
            })
            .collect()
    }

    #[test]
    fn window_is_tail_of_projection() {
        let all = messages(25);
        let mut pages = Pagination::new(10);

        let visible = pages.visible(&all);
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0].id, "15");
        assert!(pages.has_more(&all));

        pages.next_page();
        assert_eq!(pages.visible(&all).len(), 20);
        assert!(pages.has_more(&all));

        pages.next_page();
        assert_eq!(pages.visible(&all).len(), 25);
        assert!(!pages.has_more(&all));
    }

    #[test]
    fn short_projection_has_no_more() {
        let all = messages(3);
        let pages = Pagination::new(20);
        assert_eq!(pages.visible(&all).len(), 3);
        assert!(!pages.has_more(&all));
        assert!(!pages.has_more(&[]));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let pages = Pagination::new(0);
        assert_eq!(pages.page_size(), 1);
        assert_eq!(pages.page(), 1);
    }
}
