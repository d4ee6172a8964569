use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::{Adjacency, NodeId};

/// Serialized as an ordered sequence of `(key, children)` pairs, keeping key order.
impl<N: NodeId + Serialize> Serialize for Adjacency<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self.iter() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::make_basic;
    use crate::{Options, Traversal};

    #[test]
    fn adjacency_json() {
        let mut t = make_basic();
        let json = serde_json::to_string(t.adjacency().unwrap()).unwrap();
        assert_eq!(json, "[[1,[2,3]],[2,[4]]]");
    }

    #[test]
    fn options_json() {
        let o: Options = serde_json::from_str(r#"{"traversal": "Iterative"}"#).unwrap();
        assert_eq!(o.traversal, Traversal::Iterative);
        assert_eq!(o.max_depth, None);
        let back = serde_json::to_string(&o).unwrap();
        assert_eq!(
            back,
            r#"{"traversal":"Iterative","max_depth":null,"validate":false}"#
        );
    }
}
