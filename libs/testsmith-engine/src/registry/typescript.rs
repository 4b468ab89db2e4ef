// TypeScript catalog entries. Snippets avoid Map/Set so they compile
// against the default ES5 lib.

use super::CompositeDescriptor;

pub const LIST_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class ListNode {
    val: number;
    next: ListNode | null;
    constructor(val?: number, next?: ListNode | null) {
        this.val = val === undefined ? 0 : val;
        this.next = next === undefined ? null : next;
    }
}"#,
    parser: r#"function parseListNode(values: any): ListNode | null {
    if (!Array.isArray(values) || values.length === 0) return null;
    const head = new ListNode(values[0]);
    let cur = head;
    for (let i = 1; i < values.length; i++) {
        const node = new ListNode(values[i]);
        cur.next = node;
        cur = node;
    }
    return head;
}"#,
    serializer: r#"function serializeListNode(head: any): any[] {
    const out: any[] = [];
    let cur = head;
    while (cur !== null && cur !== undefined) {
        out.push(harnessToPlain(cur.val));
        cur = cur.next;
    }
    return out;
}"#,
};

pub const TREE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class TreeNode {
    val: number;
    left: TreeNode | null;
    right: TreeNode | null;
    constructor(val?: number, left?: TreeNode | null, right?: TreeNode | null) {
        this.val = val === undefined ? 0 : val;
        this.left = left === undefined ? null : left;
        this.right = right === undefined ? null : right;
    }
}"#,
    parser: r#"function parseTreeNode(values: any): TreeNode | null {
    if (!Array.isArray(values) || values.length === 0 || values[0] === null) return null;
    const root = new TreeNode(values[0]);
    const queue: TreeNode[] = [root];
    let head = 0;
    let i = 1;
    while (head < queue.length && i < values.length) {
        const node = queue[head++];
        if (i < values.length && values[i] !== null) {
            const left = new TreeNode(values[i]);
            node.left = left;
            queue.push(left);
        }
        i++;
        if (i < values.length && values[i] !== null) {
            const right = new TreeNode(values[i]);
            node.right = right;
            queue.push(right);
        }
        i++;
    }
    return root;
}"#,
    serializer: r#"function serializeTreeNode(root: any): any[] {
    const out: any[] = [];
    const queue: any[] = [root];
    let head = 0;
    while (head < queue.length) {
        const node = queue[head++];
        if (node === null || node === undefined) {
            out.push(null);
            continue;
        }
        out.push(harnessToPlain(node.val));
        queue.push(node.left === undefined ? null : node.left);
        queue.push(node.right === undefined ? null : node.right);
    }
    while (out.length > 0 && out[out.length - 1] === null) out.pop();
    return out;
}"#,
};

pub const INTERVAL: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class Interval {
    start: number;
    end: number;
    constructor(start?: number, end?: number) {
        this.start = start === undefined ? 0 : start;
        this.end = end === undefined ? 0 : end;
    }
}"#,
    parser: r#"function parseInterval(pair: any): Interval | null {
    if (!Array.isArray(pair)) return null;
    return new Interval(pair[0], pair[1]);
}"#,
    serializer: r#"function serializeInterval(interval: any): any[] | null {
    if (interval === null || interval === undefined) return null;
    return [harnessToPlain(interval.start), harnessToPlain(interval.end)];
}"#,
};

pub const GRAPH_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class GraphNode {
    val: number;
    neighbors: GraphNode[];
    constructor(val?: number, neighbors?: GraphNode[]) {
        this.val = val === undefined ? 0 : val;
        this.neighbors = neighbors === undefined ? [] : neighbors;
    }
}"#,
    parser: r#"function parseGraphNode(adjacency: any): GraphNode | null {
    if (!Array.isArray(adjacency) || adjacency.length === 0) return null;
    const nodes: GraphNode[] = [];
    for (let i = 0; i < adjacency.length; i++) nodes.push(new GraphNode(i + 1));
    for (let i = 0; i < adjacency.length; i++) {
        const row: any[] = adjacency[i] || [];
        for (let j = 0; j < row.length; j++) nodes[i].neighbors.push(nodes[row[j] - 1]);
    }
    return nodes[0];
}"#,
    serializer: r#"function serializeGraphNode(node: any): any[] {
    if (node === null || node === undefined) return [];
    const seen: { [val: string]: boolean } = {};
    const queue: any[] = [node];
    seen[String(node.val)] = true;
    let head = 0;
    while (head < queue.length) {
        const cur = queue[head++];
        const neighbors: any[] = cur.neighbors || [];
        for (let i = 0; i < neighbors.length; i++) {
            const next = neighbors[i];
            if (next && !seen[String(next.val)]) {
                seen[String(next.val)] = true;
                queue.push(next);
            }
        }
    }
    queue.sort((a: any, b: any) => a.val - b.val);
    return queue.map((n: any) => (n.neighbors || []).map((m: any) => m.val));
}"#,
};

pub const TRIE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class TrieNode {
    children: { [ch: string]: TrieNode };
    isEnd: boolean;
    constructor() {
        this.children = {};
        this.isEnd = false;
    }
}"#,
    parser: r#"function parseTrieNode(obj: any): TrieNode | null {
    if (obj === null || typeof obj !== "object" || Array.isArray(obj)) return null;
    const node = new TrieNode();
    Object.keys(obj).forEach((key: string) => {
        if (key === "isEnd") {
            node.isEnd = !!obj[key];
        } else {
            const child = parseTrieNode(obj[key]);
            if (child !== null) node.children[key] = child;
        }
    });
    return node;
}"#,
    serializer: r#"function serializeTrieNode(node: any): any {
    const out: any = {};
    if (node === null || node === undefined) return out;
    if (node.isEnd) out.isEnd = true;
    const children = node.children || {};
    Object.keys(children).forEach((key: string) => {
        out[key] = serializeTrieNode(children[key]);
    });
    return out;
}"#,
};

/// Canonical JSON, unordered normalization and console capture
pub const RUNTIME: &str = r#"function harnessStringify(value: any): string {
    if (value === null || value === undefined) return "null";
    if (Array.isArray(value)) return "[" + value.map(harnessStringify).join(",") + "]";
    if (typeof value === "object") {
        return "{" + Object.keys(value).sort().map((k: string) => JSON.stringify(k) + ":" + harnessStringify(value[k])).join(",") + "}";
    }
    if (typeof value === "number" && !isFinite(value)) return "null";
    return JSON.stringify(value);
}

function harnessCompare(a: any, b: any): number {
    if (typeof a === "number" && typeof b === "number") return a < b ? -1 : a > b ? 1 : 0;
    const sa = harnessStringify(a);
    const sb = harnessStringify(b);
    return sa < sb ? -1 : sa > sb ? 1 : 0;
}

function harnessNormalize(value: any): any {
    if (Array.isArray(value)) {
        const items = value.map(harnessNormalize);
        items.sort(harnessCompare);
        return items;
    }
    if (value !== null && typeof value === "object") {
        const out: any = {};
        Object.keys(value).forEach((k: string) => { out[k] = harnessNormalize(value[k]); });
        return out;
    }
    return value;
}

function harnessPlainBuiltin(value: any): any {
    if (value === null || value === undefined) return null;
    if (Array.isArray(value)) return value.map(harnessToPlain);
    if (typeof value === "object") {
        const out: any = {};
        Object.keys(value).forEach((k: string) => { out[k] = harnessToPlain(value[k]); });
        return out;
    }
    if (typeof value === "number" && !isFinite(value)) return null;
    return value;
}

class HarnessTimer {
    elapsed: number = 0;
    logs: string[] = [];
    private started: number = 0;
    private saved: any = null;
    private now(): number {
        const perf = (globalThis as any).performance;
        return perf && typeof perf.now === "function" ? perf.now() : Date.now();
    }
    start(): void {
        const logs = this.logs;
        const c: any = console;
        this.saved = { log: c.log, info: c.info, warn: c.warn, error: c.error, debug: c.debug };
        const capture = (...parts: any[]) => {
            logs.push(parts.map((p: any) => (typeof p === "string" ? p : harnessStringify(harnessToPlain(p)))).join(" ") + "\n");
        };
        c.log = capture;
        c.info = capture;
        c.warn = capture;
        c.error = capture;
        c.debug = capture;
        this.started = this.now();
    }
    stop(): void {
        this.elapsed = this.now() - this.started;
        this.restore();
    }
    restore(): void {
        if (this.saved === null) return;
        const c: any = console;
        c.log = this.saved.log;
        c.info = this.saved.info;
        c.warn = this.saved.warn;
        c.error = this.saved.error;
        c.debug = this.saved.debug;
        this.saved = null;
    }
}

function harnessRunCase(body: (timer: HarnessTimer) => any, expectedJson: string, accepted: string[], unordered: boolean): any {
    const timer = new HarnessTimer();
    const verdict: any = { status: "error", expected: JSON.parse(expectedJson), actual: null, time: 0 };
    let error: string | null = null;
    try {
        let actual = harnessToPlain(body(timer));
        if (unordered) actual = harnessNormalize(actual);
        const actualJson = harnessStringify(actual);
        verdict.status = accepted.indexOf(actualJson) >= 0 ? "pass" : "fail";
        verdict.actual = JSON.parse(actualJson);
    } catch (e) {
        const err: any = e;
        error = err && err.message !== undefined ? String(err.message) : String(err);
    } finally {
        timer.restore();
    }
    verdict.time = timer.elapsed;
    if (timer.logs.length > 0) verdict.logs = timer.logs.join("");
    if (error !== null) verdict.error = error;
    return verdict;
}"#;
