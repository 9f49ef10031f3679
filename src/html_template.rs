pub const HTML_CONTENT: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Songscope</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://unpkg.com/vue@3/dist/vue.global.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body class="bg-gray-100 text-gray-800">
    <div id="app" class="min-h-screen p-8">
        <header class="mb-8 flex justify-between items-center bg-white p-4 rounded-lg shadow">
            <div>
                <h1 class="text-3xl font-bold text-indigo-600">Songscope</h1>
                <div class="text-sm text-gray-500 mt-1">
                    {{ tracks.length }} tracks
                    <span v-if="degraded" class="ml-2 text-orange-600" :title="degraded">
                        (service unavailable, showing built-in catalog)
                    </span>
                </div>
            </div>
            <nav class="flex space-x-2">
                <button v-for="tab in tabs" :key="tab.id"
                    @click="activeTab = tab.id"
                    class="px-4 py-2 rounded font-medium"
                    :class="activeTab === tab.id ? 'bg-indigo-100 text-indigo-700' : 'text-gray-600 hover:bg-gray-50'">
                    {{ tab.label }}
                </button>
            </nav>
        </header>

        <div v-if="notice" class="mb-6 p-3 rounded" :class="notice.ok ? 'bg-green-100 text-green-800' : 'bg-red-100 text-red-800'">
            {{ notice.text }}
        </div>

        <!-- Browse -->
        <section v-if="activeTab === 'browse'" class="bg-white p-6 rounded-lg shadow">
            <input v-model="search" @input="loadTracks" placeholder="Search title or artist"
                class="w-full mb-4 px-3 py-2 border rounded">
            <table class="w-full text-left">
                <thead><tr class="text-gray-500 text-sm"><th>Title</th><th>Artist</th><th>Album</th><th></th></tr></thead>
                <tbody>
                    <tr v-for="t in tracks" :key="t.id" class="border-t">
                        <td class="py-2">{{ t.title }}</td>
                        <td>{{ t.artist }}</td>
                        <td>{{ t.album }}</td>
                        <td class="text-right">
                            <button @click="loadSimilar(t)" class="text-indigo-600 hover:underline">Similar</button>
                        </td>
                    </tr>
                </tbody>
            </table>
            <div v-if="similarOf" class="mt-6">
                <h2 class="text-xl font-bold mb-2">Similar to {{ similarOf.title }}</h2>
                <track-list :tracks="similar"></track-list>
            </div>
        </section>

        <!-- Compare -->
        <section v-if="activeTab === 'compare'" class="bg-white p-6 rounded-lg shadow">
            <div class="grid grid-cols-2 gap-4 mb-4">
                <select v-model="compareA" class="border rounded px-2 py-2">
                    <option disabled :value="null">Select a song</option>
                    <option v-for="s in localSongs" :key="s.id" :value="s.id" :disabled="s.id === compareB">{{ s.title }} - {{ s.artist }}</option>
                </select>
                <select v-model="compareB" class="border rounded px-2 py-2">
                    <option disabled :value="null">Select a song</option>
                    <option v-for="s in localSongs" :key="s.id" :value="s.id" :disabled="s.id === compareA">{{ s.title }} - {{ s.artist }}</option>
                </select>
            </div>
            <button @click="compare" :disabled="!compareA || !compareB"
                class="bg-indigo-600 text-white px-4 py-2 rounded disabled:opacity-50">Calculate Similarity</button>
            <div v-if="comparison" class="mt-6">
                <p class="mb-2">How similar <b>{{ comparison.a.title }}</b> is to <b>{{ comparison.b.title }}</b></p>
                <div class="text-4xl font-bold text-indigo-600">{{ comparison.percent }}%</div>
                <div class="w-full bg-gray-200 rounded-full h-2.5 mt-2">
                    <div class="bg-indigo-600 h-2.5 rounded-full" :style="{ width: comparison.percent + '%' }"></div>
                </div>
            </div>
        </section>

        <!-- Recommend -->
        <section v-if="activeTab === 'recommend'" class="bg-white p-6 rounded-lg shadow">
            <p class="mb-4 text-gray-600">Like a few tracks, then ask for recommendations.</p>
            <div class="grid grid-cols-2 gap-2 mb-4">
                <button v-for="t in tracks" :key="t.id" @click="toggleLike(t.id)"
                    class="text-left px-3 py-2 rounded border"
                    :class="liked.has(t.id) ? 'border-pink-500 bg-pink-50' : ''">
                    {{ liked.has(t.id) ? '♥' : '♡' }} {{ t.title }} <span class="text-gray-500">{{ t.artist }}</span>
                </button>
            </div>
            <button @click="recommend" :disabled="liked.size === 0 || busy"
                class="bg-indigo-600 text-white px-4 py-2 rounded disabled:opacity-50">
                Get Recommendations ({{ liked.size }})
            </button>
            <button @click="resetLikes" class="ml-2 text-gray-600">Reset</button>
            <div v-if="recommendations" class="mt-6">
                <track-list :tracks="recommendations"></track-list>
            </div>
        </section>

        <!-- Identify -->
        <section v-if="activeTab === 'identify'" class="bg-white p-6 rounded-lg shadow text-center">
            <button @click="toggleRecording"
                class="w-40 h-40 rounded-full border-8 text-xl font-bold"
                :class="recording ? 'border-red-400 bg-red-100 animate-pulse' : 'border-indigo-300 bg-indigo-50'">
                {{ recording ? 'Stop' : 'Listen' }}
            </button>
            <p class="my-4 text-gray-500">or</p>
            <input type="file" accept="audio/*" @change="e => identifyFile(e.target.files[0])">
            <div v-if="identified !== undefined" class="mt-6">
                <div v-if="identified" class="text-xl">
                    <b>{{ identified.title }}</b> by {{ identified.artist }} <span class="text-gray-500">({{ identified.album }})</span>
                </div>
                <div v-else class="text-gray-600">No match found.</div>
            </div>
        </section>

        <!-- Add song -->
        <section v-if="activeTab === 'add'" class="bg-white p-6 rounded-lg shadow max-w-xl">
            <form @submit.prevent="addSong" class="space-y-3">
                <input v-model="newSong.title" placeholder="Title" class="w-full px-3 py-2 border rounded">
                <input v-model="newSong.artist" placeholder="Artist" class="w-full px-3 py-2 border rounded">
                <input v-model="newSong.album" placeholder="Album" class="w-full px-3 py-2 border rounded">
                <input v-model="newSong.image" placeholder="https://example.com/image.jpg" class="w-full px-3 py-2 border rounded">
                <input type="file" accept="audio/*" @change="e => newSongFile = e.target.files[0]">
                <button type="submit" :disabled="busy" class="bg-indigo-600 text-white px-4 py-2 rounded disabled:opacity-50">Add Song</button>
            </form>
        </section>

        <!-- Radar -->
        <section v-if="activeTab === 'radar'" class="bg-white p-6 rounded-lg shadow">
            <canvas ref="radarCanvas" height="120"></canvas>
        </section>
    </div>

    <script>
        const { createApp, nextTick } = Vue;

        const TrackList = {
            props: ['tracks'],
            template: `
                <div>
                    <div v-if="tracks.length === 0" class="text-gray-500">Nothing to show.</div>
                    <div v-for="t in tracks" :key="t.id" class="flex items-center p-2 border-t">
                        <div class="flex-1">
                            <div class="font-semibold">{{ t.title }}</div>
                            <div class="text-sm text-gray-500">{{ t.artist }} • {{ t.album }}</div>
                        </div>
                        <div v-if="t.match !== undefined" class="font-semibold"
                            :class="t.match > 85 ? 'text-green-600' : t.match > 75 ? 'text-yellow-600' : 'text-orange-600'">
                            {{ t.match.toFixed(1) }}% Match
                        </div>
                    </div>
                </div>`
        };

        function readAsBase64(blob) {
            return new Promise((resolve, reject) => {
                const reader = new FileReader();
                reader.onloadend = () => resolve(reader.result.split(',')[1]);
                reader.onerror = reject;
                reader.readAsDataURL(blob);
            });
        }

        createApp({
            components: { TrackList },
            data() {
                return {
                    tabs: [
                        { id: 'browse', label: 'Browse' },
                        { id: 'compare', label: 'Compare' },
                        { id: 'recommend', label: 'Recommend' },
                        { id: 'identify', label: 'Identify' },
                        { id: 'add', label: 'Add Song' },
                        { id: 'radar', label: 'Radar' },
                    ],
                    activeTab: 'browse',
                    tracks: [],
                    degraded: null,
                    search: '',
                    similarOf: null,
                    similar: [],
                    localSongs: [],
                    compareA: null,
                    compareB: null,
                    comparison: null,
                    liked: new Set(),
                    recommendations: null,
                    recorder: null,
                    recording: false,
                    identified: undefined,
                    newSong: { title: '', artist: '', album: '', image: '' },
                    newSongFile: null,
                    busy: false,
                    notice: null,
                    radarChart: null,
                };
            },
            watch: {
                activeTab(tab) {
                    if (tab === 'radar') nextTick(this.loadRadar);
                },
            },
            methods: {
                report(fetched) {
                    if (fetched.source === 'fallback') {
                        this.notice = { ok: false, text: 'Service unavailable: ' + fetched.reason };
                    }
                    return fetched.data;
                },
                async loadTracks() {
                    const res = await fetch('/api/tracks?search=' + encodeURIComponent(this.search));
                    const fetched = await res.json();
                    this.degraded = fetched.source === 'fallback' ? fetched.reason : null;
                    this.tracks = fetched.data;
                },
                async loadLocalSongs() {
                    const res = await fetch('/api/local-songs');
                    this.localSongs = await res.json();
                },
                async loadSimilar(track) {
                    this.similarOf = track;
                    const res = await fetch('/api/similar/' + track.id);
                    this.similar = this.report(await res.json());
                },
                async compare() {
                    const res = await fetch(`/api/compare?a=${this.compareA}&b=${this.compareB}`);
                    this.comparison = await res.json();
                },
                toggleLike(id) {
                    const next = new Set(this.liked);
                    next.has(id) ? next.delete(id) : next.add(id);
                    this.liked = next;
                },
                resetLikes() {
                    this.liked = new Set();
                    this.recommendations = null;
                },
                async recommend() {
                    this.busy = true;
                    const res = await fetch('/api/recommend', {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ song_ids: Array.from(this.liked) }),
                    });
                    this.recommendations = this.report(await res.json());
                    this.busy = false;
                },
                async identifyBlob(blob) {
                    this.identified = undefined;
                    const audio = await readAsBase64(blob);
                    const res = await fetch('/api/identify', {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ audio_base64: audio }),
                    });
                    this.identified = this.report(await res.json());
                },
                identifyFile(file) {
                    if (file) this.identifyBlob(file);
                },
                async toggleRecording() {
                    if (this.recording) {
                        this.recorder.stop();
                        return;
                    }
                    const stream = await navigator.mediaDevices.getUserMedia({ audio: true });
                    const chunks = [];
                    this.recorder = new MediaRecorder(stream);
                    this.recorder.ondataavailable = e => chunks.push(e.data);
                    this.recorder.onstop = () => {
                        stream.getTracks().forEach(t => t.stop());
                        this.recording = false;
                        this.identifyBlob(new Blob(chunks, { type: this.recorder.mimeType }));
                    };
                    this.recorder.start();
                    this.recording = true;
                },
                async addSong() {
                    if (!this.newSong.title || !this.newSong.artist || !this.newSong.album || !this.newSongFile) {
                        this.notice = { ok: false, text: 'Please fill out all fields and select an audio file.' };
                        return;
                    }
                    this.busy = true;
                    try {
                        const track = await readAsBase64(this.newSongFile);
                        const res = await fetch('/api/songs', {
                            method: 'POST',
                            headers: { 'Content-Type': 'application/json' },
                            body: JSON.stringify({ ...this.newSong, track }),
                        });
                        if (res.ok) {
                            this.notice = { ok: true, text: `${this.newSong.title} by ${this.newSong.artist} has been added.` };
                            this.newSong = { title: '', artist: '', album: '', image: '' };
                            this.newSongFile = null;
                            this.loadTracks();
                        } else {
                            const body = await res.json();
                            this.notice = { ok: false, text: 'Could not add the song: ' + body.error };
                        }
                    } catch (e) {
                        this.notice = { ok: false, text: 'There was an error reading the audio file.' };
                    } finally {
                        this.busy = false;
                    }
                },
                async loadRadar() {
                    const res = await fetch('/api/radar');
                    const points = this.report(await res.json());
                    if (this.radarChart) this.radarChart.destroy();
                    this.radarChart = new Chart(this.$refs.radarCanvas, {
                        type: 'scatter',
                        data: {
                            datasets: [{
                                label: 'Songs',
                                data: points.map(p => ({ x: p.x, y: p.y, label: `${p.title} - ${p.artist}` })),
                                backgroundColor: '#4f46e5',
                            }],
                        },
                        options: {
                            plugins: {
                                tooltip: { callbacks: { label: ctx => ctx.raw.label } },
                            },
                        },
                    });
                },
            },
            mounted() {
                this.loadTracks();
                this.loadLocalSongs();
            },
        }).mount('#app');
    </script>
</body>
</html>
"#;
