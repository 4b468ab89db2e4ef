// Java catalog entries. Definitions are package-private top-level classes;
// parsers and serializers are static members of the generated `Main` and
// work on the JSON tree produced by `harnessParseJson`
// (List / TreeMap / Long / Double / String / Boolean / null).

use super::CompositeDescriptor;

pub const LIST_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class ListNode {
    int val;
    ListNode next;
    ListNode() {}
    ListNode(int val) { this.val = val; }
    ListNode(int val, ListNode next) { this.val = val; this.next = next; }
}"#,
    parser: r#"    static ListNode parseListNode(Object json) {
        if (!(json instanceof List)) return null;
        ListNode dummy = new ListNode(0);
        ListNode cur = dummy;
        for (Object value : (List<?>) json) {
            cur.next = new ListNode(((Number) value).intValue());
            cur = cur.next;
        }
        return dummy.next;
    }"#,
    serializer: r#"    static List<Object> serializeListNode(ListNode head) {
        List<Object> out = new ArrayList<>();
        for (ListNode cur = head; cur != null; cur = cur.next) {
            out.add(harnessToPlain(cur.val));
        }
        return out;
    }"#,
};

pub const TREE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class TreeNode {
    int val;
    TreeNode left;
    TreeNode right;
    TreeNode() {}
    TreeNode(int val) { this.val = val; }
    TreeNode(int val, TreeNode left, TreeNode right) {
        this.val = val;
        this.left = left;
        this.right = right;
    }
}"#,
    parser: r#"    static TreeNode parseTreeNode(Object json) {
        if (!(json instanceof List)) return null;
        List<?> values = (List<?>) json;
        if (values.isEmpty() || values.get(0) == null) return null;
        TreeNode root = new TreeNode(((Number) values.get(0)).intValue());
        Deque<TreeNode> queue = new ArrayDeque<>();
        queue.add(root);
        int i = 1;
        while (!queue.isEmpty() && i < values.size()) {
            TreeNode node = queue.poll();
            if (i < values.size() && values.get(i) != null) {
                node.left = new TreeNode(((Number) values.get(i)).intValue());
                queue.add(node.left);
            }
            i++;
            if (i < values.size() && values.get(i) != null) {
                node.right = new TreeNode(((Number) values.get(i)).intValue());
                queue.add(node.right);
            }
            i++;
        }
        return root;
    }"#,
    serializer: r#"    static List<Object> serializeTreeNode(TreeNode root) {
        List<Object> out = new ArrayList<>();
        LinkedList<TreeNode> queue = new LinkedList<>();
        queue.add(root);
        while (!queue.isEmpty()) {
            TreeNode node = queue.poll();
            if (node == null) {
                out.add(null);
                continue;
            }
            out.add(harnessToPlain(node.val));
            queue.add(node.left);
            queue.add(node.right);
        }
        while (!out.isEmpty() && out.get(out.size() - 1) == null) out.remove(out.size() - 1);
        return out;
    }"#,
};

pub const INTERVAL: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class Interval {
    int start;
    int end;
    Interval() {}
    Interval(int start, int end) { this.start = start; this.end = end; }
}"#,
    parser: r#"    static Interval parseInterval(Object json) {
        if (!(json instanceof List)) return null;
        List<?> pair = (List<?>) json;
        return new Interval(((Number) pair.get(0)).intValue(), ((Number) pair.get(1)).intValue());
    }"#,
    serializer: r#"    static List<Object> serializeInterval(Interval interval) {
        if (interval == null) return null;
        List<Object> out = new ArrayList<>();
        out.add(harnessToPlain(interval.start));
        out.add(harnessToPlain(interval.end));
        return out;
    }"#,
};

pub const GRAPH_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class GraphNode {
    public int val;
    public List<GraphNode> neighbors;
    public GraphNode() { this(0); }
    public GraphNode(int val) { this.val = val; this.neighbors = new ArrayList<GraphNode>(); }
    public GraphNode(int val, List<GraphNode> neighbors) { this.val = val; this.neighbors = neighbors; }
}"#,
    parser: r#"    static GraphNode parseGraphNode(Object json) {
        if (!(json instanceof List)) return null;
        List<?> adjacency = (List<?>) json;
        if (adjacency.isEmpty()) return null;
        List<GraphNode> nodes = new ArrayList<>();
        for (int i = 0; i < adjacency.size(); i++) nodes.add(new GraphNode(i + 1));
        for (int i = 0; i < adjacency.size(); i++) {
            Object row = adjacency.get(i);
            if (!(row instanceof List)) continue;
            for (Object v : (List<?>) row) nodes.get(i).neighbors.add(nodes.get(((Number) v).intValue() - 1));
        }
        return nodes.get(0);
    }"#,
    serializer: r#"    static List<Object> serializeGraphNode(GraphNode node) {
        List<Object> out = new ArrayList<>();
        if (node == null) return out;
        Map<Integer, GraphNode> seen = new TreeMap<>();
        Deque<GraphNode> queue = new ArrayDeque<>();
        seen.put(node.val, node);
        queue.add(node);
        while (!queue.isEmpty()) {
            GraphNode cur = queue.poll();
            if (cur.neighbors == null) continue;
            for (GraphNode next : cur.neighbors) {
                if (next != null && !seen.containsKey(next.val)) {
                    seen.put(next.val, next);
                    queue.add(next);
                }
            }
        }
        for (GraphNode n : seen.values()) {
            List<Object> row = new ArrayList<>();
            if (n.neighbors != null) {
                for (GraphNode m : n.neighbors) row.add((long) m.val);
            }
            out.add(row);
        }
        return out;
    }"#,
};

pub const TRIE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class TrieNode {
    Map<Character, TrieNode> children = new HashMap<>();
    boolean isEnd;
    TrieNode() {}
}"#,
    parser: r#"    static TrieNode parseTrieNode(Object json) {
        if (!(json instanceof Map)) return null;
        TrieNode node = new TrieNode();
        for (Map.Entry<?, ?> e : ((Map<?, ?>) json).entrySet()) {
            String key = String.valueOf(e.getKey());
            if (key.equals("isEnd")) {
                node.isEnd = Boolean.TRUE.equals(e.getValue());
            } else if (!key.isEmpty()) {
                TrieNode child = parseTrieNode(e.getValue());
                if (child != null) node.children.put(key.charAt(0), child);
            }
        }
        return node;
    }"#,
    serializer: r#"    static Map<String, Object> serializeTrieNode(TrieNode node) {
        Map<String, Object> out = new TreeMap<>();
        if (node == null) return out;
        if (node.isEnd) out.put("isEnd", Boolean.TRUE);
        for (Map.Entry<Character, TrieNode> e : node.children.entrySet()) {
            out.put(String.valueOf(e.getKey()), serializeTrieNode(e.getValue()));
        }
        return out;
    }"#,
};

/// JSON reader/writer, builtin plain conversion, normalization and the
/// verdict builder. Emitted inside `Main`.
pub const RUNTIME: &str = r#"    static final class HarnessJsonReader {
        private final String text;
        private int pos;

        HarnessJsonReader(String text) { this.text = text; }

        Object read() {
            Object value = value();
            skip();
            return value;
        }

        private void skip() {
            while (pos < text.length() && Character.isWhitespace(text.charAt(pos))) pos++;
        }

        private Object value() {
            skip();
            char c = text.charAt(pos);
            if (c == '[') {
                pos++;
                List<Object> list = new ArrayList<>();
                skip();
                if (text.charAt(pos) == ']') { pos++; return list; }
                while (true) {
                    list.add(value());
                    skip();
                    if (text.charAt(pos++) == ']') return list;
                }
            }
            if (c == '{') {
                pos++;
                Map<String, Object> map = new TreeMap<>();
                skip();
                if (text.charAt(pos) == '}') { pos++; return map; }
                while (true) {
                    skip();
                    String key = string();
                    skip();
                    pos++;
                    map.put(key, value());
                    skip();
                    if (text.charAt(pos++) == '}') return map;
                }
            }
            if (c == '"') return string();
            if (text.startsWith("true", pos)) { pos += 4; return Boolean.TRUE; }
            if (text.startsWith("false", pos)) { pos += 5; return Boolean.FALSE; }
            if (text.startsWith("null", pos)) { pos += 4; return null; }
            int start = pos;
            while (pos < text.length() && "+-0123456789.eE".indexOf(text.charAt(pos)) >= 0) pos++;
            String number = text.substring(start, pos);
            if (number.indexOf('.') >= 0 || number.indexOf('e') >= 0 || number.indexOf('E') >= 0) {
                return Double.parseDouble(number);
            }
            try {
                return Long.parseLong(number);
            } catch (NumberFormatException e) {
                return Double.parseDouble(number);
            }
        }

        private String string() {
            StringBuilder sb = new StringBuilder();
            pos++;
            while (pos < text.length()) {
                char c = text.charAt(pos++);
                if (c == '"') break;
                if (c != '\\') { sb.append(c); continue; }
                char e = text.charAt(pos++);
                switch (e) {
                    case 'n': sb.append('\n'); break;
                    case 't': sb.append('\t'); break;
                    case 'r': sb.append('\r'); break;
                    case 'b': sb.append('\b'); break;
                    case 'f': sb.append('\f'); break;
                    case 'u':
                        sb.append((char) Integer.parseInt(text.substring(pos, pos + 4), 16));
                        pos += 4;
                        break;
                    default: sb.append(e);
                }
            }
            return sb.toString();
        }
    }

    static Object harnessParseJson(String text) {
        return new HarnessJsonReader(text).read();
    }

    static String harnessFormatDouble(double d) {
        if (Double.isNaN(d) || Double.isInfinite(d)) return "null";
        if (d == Math.rint(d) && Math.abs(d) < 1e15) return Long.toString((long) d);
        return Double.toString(d);
    }

    static void harnessWriteString(StringBuilder sb, String s) {
        sb.append('"');
        for (int i = 0; i < s.length(); i++) {
            char c = s.charAt(i);
            switch (c) {
                case '"': sb.append("\\\""); break;
                case '\\': sb.append("\\\\"); break;
                case '\n': sb.append("\\n"); break;
                case '\r': sb.append("\\r"); break;
                case '\t': sb.append("\\t"); break;
                case '\b': sb.append("\\b"); break;
                case '\f': sb.append("\\f"); break;
                default:
                    if (c < 0x20) sb.append(String.format("\\u%04x", (int) c));
                    else sb.append(c);
            }
        }
        sb.append('"');
    }

    static void harnessWriteJson(StringBuilder sb, Object value) {
        if (value == null) { sb.append("null"); return; }
        if (value instanceof String) { harnessWriteString(sb, (String) value); return; }
        if (value instanceof Boolean) { sb.append(value.toString()); return; }
        if (value instanceof Double || value instanceof Float) {
            sb.append(harnessFormatDouble(((Number) value).doubleValue()));
            return;
        }
        if (value instanceof Number) { sb.append(((Number) value).longValue()); return; }
        if (value instanceof List) {
            sb.append('[');
            boolean first = true;
            for (Object item : (List<?>) value) {
                if (!first) sb.append(',');
                first = false;
                harnessWriteJson(sb, item);
            }
            sb.append(']');
            return;
        }
        if (value instanceof Map) {
            Map<String, Object> sorted = new TreeMap<>();
            for (Map.Entry<?, ?> e : ((Map<?, ?>) value).entrySet()) sorted.put(String.valueOf(e.getKey()), e.getValue());
            sb.append('{');
            boolean first = true;
            for (Map.Entry<String, Object> e : sorted.entrySet()) {
                if (!first) sb.append(',');
                first = false;
                harnessWriteString(sb, e.getKey());
                sb.append(':');
                harnessWriteJson(sb, e.getValue());
            }
            sb.append('}');
            return;
        }
        harnessWriteString(sb, String.valueOf(value));
    }

    static String harnessStringify(Object value) {
        StringBuilder sb = new StringBuilder();
        harnessWriteJson(sb, value);
        return sb.toString();
    }

    static Object harnessPlainBuiltin(Object value) {
        if (value == null) return null;
        List<Object> out = new ArrayList<>();
        if (value instanceof int[]) { for (int v : (int[]) value) out.add((long) v); return out; }
        if (value instanceof long[]) { for (long v : (long[]) value) out.add(v); return out; }
        if (value instanceof double[]) { for (double v : (double[]) value) out.add(v); return out; }
        if (value instanceof float[]) { for (float v : (float[]) value) out.add((double) v); return out; }
        if (value instanceof short[]) { for (short v : (short[]) value) out.add((long) v); return out; }
        if (value instanceof byte[]) { for (byte v : (byte[]) value) out.add((long) v); return out; }
        if (value instanceof char[]) { for (char v : (char[]) value) out.add(String.valueOf(v)); return out; }
        if (value instanceof boolean[]) { for (boolean v : (boolean[]) value) out.add(v); return out; }
        if (value instanceof Object[]) { for (Object v : (Object[]) value) out.add(harnessToPlain(v)); return out; }
        if (value instanceof Iterable) { for (Object v : (Iterable<?>) value) out.add(harnessToPlain(v)); return out; }
        if (value instanceof Map) {
            Map<String, Object> map = new TreeMap<>();
            for (Map.Entry<?, ?> e : ((Map<?, ?>) value).entrySet()) {
                map.put(String.valueOf(e.getKey()), harnessToPlain(e.getValue()));
            }
            return map;
        }
        if (value instanceof Character) return String.valueOf(value);
        if (value instanceof Float) return ((Float) value).doubleValue();
        if (value instanceof Integer || value instanceof Short || value instanceof Byte) {
            return ((Number) value).longValue();
        }
        if (value instanceof Number || value instanceof String || value instanceof Boolean) return value;
        return String.valueOf(value);
    }

    static int harnessCompare(Object a, Object b) {
        if (a instanceof Number && b instanceof Number) {
            return Double.compare(((Number) a).doubleValue(), ((Number) b).doubleValue());
        }
        return harnessStringify(a).compareTo(harnessStringify(b));
    }

    static Object harnessNormalize(Object value) {
        if (value instanceof List) {
            List<Object> items = new ArrayList<>();
            for (Object item : (List<?>) value) items.add(harnessNormalize(item));
            items.sort(Main::harnessCompare);
            return items;
        }
        if (value instanceof Map) {
            Map<String, Object> out = new TreeMap<>();
            for (Map.Entry<?, ?> e : ((Map<?, ?>) value).entrySet()) {
                out.put(String.valueOf(e.getKey()), harnessNormalize(e.getValue()));
            }
            return out;
        }
        return value;
    }

    static char[] harnessCharArray(Object json) {
        List<?> values = (List<?>) json;
        char[] out = new char[values.size()];
        for (int i = 0; i < out.length; i++) out[i] = String.valueOf(values.get(i)).charAt(0);
        return out;
    }

    static boolean[] harnessBooleanArray(Object json) {
        List<?> values = (List<?>) json;
        boolean[] out = new boolean[values.size()];
        for (int i = 0; i < out.length; i++) out[i] = Boolean.TRUE.equals(values.get(i));
        return out;
    }

    static String harnessVerdict(String status, String expectedJson, String actualJson, double time, String logs, String error) {
        StringBuilder sb = new StringBuilder("{\"status\":");
        harnessWriteString(sb, status);
        sb.append(",\"expected\":").append(expectedJson);
        sb.append(",\"actual\":").append(actualJson);
        sb.append(",\"time\":").append(harnessFormatDouble(time));
        if (logs != null && !logs.isEmpty()) {
            sb.append(",\"logs\":");
            harnessWriteString(sb, logs);
        }
        if (error != null) {
            sb.append(",\"error\":");
            harnessWriteString(sb, error);
        }
        return sb.append('}').toString();
    }"#;
